/// Split a PEP 508 requirement string into its `(project_name, marker)` parts: the marker is
/// everything after the first top-level `;`, trimmed; the project name is the leading identifier
/// before any extras, version specifier, or marker.
pub fn parse(requirement: &str) -> (String, Option<String>) {
    let (specifier, marker) = match requirement.split_once(';') {
        Some((specifier, marker)) => (specifier, Some(marker.trim().to_string())),
        None => (requirement, None),
    };

    let end = specifier
        .find(|c: char| matches!(c, '[' | '<' | '>' | '=' | '!' | '~' | ' ' | '\t'))
        .unwrap_or(specifier.len());
    let project_name = specifier[..end].trim().to_string();

    (project_name, marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_requirement_has_no_marker() {
        assert_eq!(parse("requests"), ("requests".to_string(), None));
    }

    #[test]
    fn versioned_requirement_strips_specifier() {
        assert_eq!(parse("requests>=2,<3"), ("requests".to_string(), None));
    }

    #[test]
    fn extras_and_marker_are_both_stripped() {
        let (name, marker) = parse("requests[socks]>=2; python_version >= \"3.8\"");
        assert_eq!(name, "requests");
        assert_eq!(marker.as_deref(), Some("python_version >= \"3.8\""));
    }
}
