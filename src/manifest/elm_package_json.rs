//! elm-package.json parser for Elm 0.18 projects
//!
//! Handles:
//! - `dependencies` section (package name → version constraint)
//! - optional `elm-version` range

use crate::domain::{DeclaredDependency, ElmVersionRange, PackageName};
use crate::error::ManifestError;
use crate::manifest::Manifest;
use serde_json::{Map, Value};

/// Parser for elm-package.json files
pub struct ElmPackageJsonParser;

impl ElmPackageJsonParser {
    /// Parse a manifest document
    pub fn parse(&self, content: &str) -> Result<Manifest, ManifestError> {
        let json: Value =
            serde_json::from_str(content).map_err(|e| ManifestError::invalid_json(e.to_string()))?;

        let root = json.as_object().ok_or(ManifestError::NotAnObject)?;

        let deps = root
            .get("dependencies")
            .ok_or(ManifestError::MissingDependencies)?
            .as_object()
            .ok_or(ManifestError::DependenciesNotAnObject)?;

        let dependencies = parse_dependency_object(deps)?;

        let elm_version = root
            .get("elm-version")
            .and_then(Value::as_str)
            .and_then(ElmVersionRange::parse);

        Ok(Manifest {
            dependencies,
            elm_version,
        })
    }
}

fn parse_dependency_object(
    deps: &Map<String, Value>,
) -> Result<Vec<DeclaredDependency>, ManifestError> {
    let mut output = Vec::with_capacity(deps.len());

    for (name, constraint) in deps {
        match constraint.as_str() {
            Some(constraint) => output.push(DeclaredDependency::new(name.as_str(), constraint)),
            None => {
                return Err(ManifestError::InvalidConstraint {
                    package: PackageName::from(name.as_str()),
                    parsed: output.into_iter().map(|d| d.name).collect(),
                });
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Manifest, ManifestError> {
        ElmPackageJsonParser.parse(content)
    }

    fn names(manifest: &Manifest) -> Vec<&str> {
        manifest.package_names().map(PackageName::as_str).collect()
    }

    #[test]
    fn test_parse_typical_manifest() {
        let content = r#"{
            "version": "1.0.0",
            "summary": "helpful summary of your project, less than 80 characters",
            "repository": "https://github.com/user/project.git",
            "license": "BSD3",
            "source-directories": ["."],
            "exposed-modules": [],
            "dependencies": {
                "elm-lang/core": "5.1.1 <= v < 6.0.0",
                "elm-lang/html": "2.0.0 <= v < 3.0.0"
            },
            "elm-version": "0.18.0 <= v < 0.19.0"
        }"#;

        let manifest = parse(content).unwrap();
        assert_eq!(names(&manifest), vec!["elm-lang/core", "elm-lang/html"]);
        assert_eq!(manifest.dependencies[0].constraint, "5.1.1 <= v < 6.0.0");
        assert_eq!(
            manifest.elm_version.as_ref().map(ToString::to_string),
            Some("0.18.0 <= v < 0.19.0".to_string())
        );
    }

    #[test]
    fn test_parse_preserves_declaration_order() {
        let content = r#"{"dependencies": {
            "zwilias/elm-html-string": "2.0.0 <= v < 3.0.0",
            "elm-lang/core": "5.1.1 <= v < 6.0.0",
            "NoRedInk/elm-decode-pipeline": "3.0.0 <= v < 4.0.0"
        }}"#;

        let manifest = parse(content).unwrap();
        assert_eq!(
            names(&manifest),
            vec![
                "zwilias/elm-html-string",
                "elm-lang/core",
                "NoRedInk/elm-decode-pipeline"
            ]
        );
    }

    #[test]
    fn test_parse_empty_dependencies() {
        let manifest = parse(r#"{"dependencies": {}}"#).unwrap();
        assert!(manifest.dependencies.is_empty());
        assert!(manifest.elm_version.is_none());
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse(r#"{"dependencies": {"#).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidJson { .. }));
    }

    #[test]
    fn test_parse_not_an_object() {
        let err = parse(r#"["elm-lang/core"]"#).unwrap_err();
        assert_eq!(err, ManifestError::NotAnObject);
    }

    #[test]
    fn test_parse_missing_dependencies() {
        let err = parse(r#"{"version": "1.0.0"}"#).unwrap_err();
        assert_eq!(err, ManifestError::MissingDependencies);
    }

    #[test]
    fn test_parse_dependencies_not_an_object() {
        let err = parse(r#"{"dependencies": ["elm-lang/core"]}"#).unwrap_err();
        assert_eq!(err, ManifestError::DependenciesNotAnObject);
    }

    #[test]
    fn test_parse_non_string_constraint_reports_progress() {
        let content = r#"{"dependencies": {
            "elm-lang/core": "5.1.1 <= v < 6.0.0",
            "elm-lang/html": "2.0.0 <= v < 3.0.0",
            "elm-lang/http": 1,
            "elm-lang/svg": "2.0.0 <= v < 3.0.0"
        }}"#;

        let err = parse(content).unwrap_err();
        assert_eq!(
            err,
            ManifestError::InvalidConstraint {
                package: "elm-lang/http".into(),
                parsed: vec!["elm-lang/core".into(), "elm-lang/html".into()],
            }
        );
    }

    #[test]
    fn test_unparseable_elm_version_is_ignored() {
        let manifest = parse(r#"{"dependencies": {}, "elm-version": "0.18.0"}"#).unwrap();
        assert!(manifest.elm_version.is_none());
    }
}
