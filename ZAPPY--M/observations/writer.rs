use std::{fs, path::Path};

use crate::{error::ObservationError, plan::Plan};

/// Renders a plan one action per line, each line terminated by `\n`.
#[must_use]
pub fn render_plan(plan: &Plan) -> String {
    let capacity = plan.iter().map(|action| action.as_str().len() + 1).sum();
    plan.iter().fold(String::with_capacity(capacity), |mut out, action| {
        out.push_str(action.as_str());
        out.push('\n');
        out
    })
}

/// Writes a plan to `path`, replacing any existing content.
///
/// # Errors
/// Returns [`ObservationError::Io`] when the file cannot be written.
pub fn write_plan(path: impl AsRef<Path>, plan: &Plan) -> Result<(), ObservationError> {
    let path = path.as_ref();
    fs::write(path, render_plan(plan)).map_err(|source| ObservationError::io(path, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Action;
    use tempfile::tempdir;

    #[test]
    fn writes_one_action_per_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p01.txt");
        let plan: Plan = ["(pick a)", "(place a t)"].into_iter().map(Action::from).collect();
        write_plan(&path, &plan).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "(pick a)\n(place a t)\n");
    }

    #[test]
    fn overwrites_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p02.txt");
        fs::write(&path, "(stale one)\n(stale two)\n(stale three)\n").unwrap();
        write_plan(&path, &Plan::new(vec![Action::from("(fresh)")])).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "(fresh)\n");
    }

    #[test]
    fn empty_plan_produces_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        write_plan(&path, &Plan::default()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn missing_parent_directory_is_an_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent").join("p.txt");
        let err = write_plan(&path, &Plan::default()).unwrap_err();
        assert!(matches!(err, ObservationError::Io { .. }));
    }
}
