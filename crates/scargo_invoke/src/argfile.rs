//! Newline-delimited argument spill files.
//!
//! Long command lines are written to a file and replayed by a bootstrap main
//! class, sidestepping OS command-length limits. Tokens containing
//! whitespace are wrapped in double quotes on write and unwrapped on read;
//! no other escaping exists, so a token containing a literal `"` does not
//! round-trip. That is a documented limitation of the format, not a bug to
//! fix here.

use std::io;
use std::path::Path;

/// Combined argument length above which arguments are spilled to a file.
pub const ARG_SPILL_THRESHOLD: usize = 400;

/// Returns `true` if the given argument list should be spilled to a file.
///
/// The length estimate counts one separating space per argument, matching
/// what the shell command line would occupy.
pub fn needs_arg_file(args: &[String], force: bool) -> bool {
    if force {
        return true;
    }
    let total: usize = args.iter().map(|a| a.len() + 1).sum();
    total > ARG_SPILL_THRESHOLD
}

/// Writes arguments to `path`, one per line, quoting tokens with whitespace.
pub fn write_arg_file(path: &Path, args: &[String]) -> io::Result<()> {
    let mut content = String::new();
    for arg in args {
        if arg.chars().any(char::is_whitespace) {
            content.push('"');
            content.push_str(arg);
            content.push('"');
        } else {
            content.push_str(arg);
        }
        content.push('\n');
    }
    std::fs::write(path, content)
}

/// Reads an argument file written by [`write_arg_file`].
///
/// Surrounding double quotes are stripped; empty lines are skipped.
pub fn read_arg_file(path: &Path) -> io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            if line.len() >= 2 && line.starts_with('"') && line.ends_with('"') {
                line[1..line.len() - 1].to_string()
            } else {
                line.to_string()
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn roundtrip_plain_and_spaced() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("args.txt");
        let args = vec![
            "-classpath".to_string(),
            "/lib/scala library.jar".to_string(),
            "-d".to_string(),
            "/out/classes".to_string(),
        ];
        write_arg_file(&path, &args).unwrap();
        assert_eq!(read_arg_file(&path).unwrap(), args);
    }

    #[test]
    fn literal_quote_does_not_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("args.txt");
        // A token that is itself quote-wrapped: the reader cannot tell the
        // literal quotes from the quoting added for whitespace and strips
        // them. Documented limitation of the format.
        let args = vec!["\"hi\"".to_string()];
        write_arg_file(&path, &args).unwrap();
        let back = read_arg_file(&path).unwrap();
        assert_ne!(back, args);
        assert_eq!(back, vec!["hi"]);
    }

    #[test]
    fn empty_lines_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("args.txt");
        std::fs::write(&path, "-verbose\n\n-deprecation\n").unwrap();
        assert_eq!(read_arg_file(&path).unwrap(), vec!["-verbose", "-deprecation"]);
    }

    #[test]
    fn empty_list_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("args.txt");
        write_arg_file(&path, &[]).unwrap();
        assert!(read_arg_file(&path).unwrap().is_empty());
    }

    #[test]
    fn spill_decision_by_length() {
        let short = vec!["-d".to_string(), "/out".to_string()];
        assert!(!needs_arg_file(&short, false));

        let long = vec!["x".repeat(ARG_SPILL_THRESHOLD + 1)];
        assert!(needs_arg_file(&long, false));
    }

    #[test]
    fn spill_forced() {
        let short = vec!["-d".to_string()];
        assert!(needs_arg_file(&short, true));
    }

    #[test]
    fn many_small_args_cross_threshold() {
        let args: Vec<String> = (0..200).map(|i| format!("a{i}")).collect();
        assert!(needs_arg_file(&args, false));
    }
}
