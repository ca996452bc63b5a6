//! Flat in-memory filesystem backing a single session.
//!
//! There is no directory tree: a path is an opaque, case-sensitive key. Paths such
//! as `dir1/dir2/secret` only exist so that `find` has something to match against.
//! The only directory any listing accepts is the root (`.` or empty).

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::BTreeMap;

const HIDDEN_PREFIX: char = '.';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualFs {
    files: BTreeMap<String, String>,
}

impl VirtualFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(files: &BTreeMap<String, String>) -> Self {
        Self {
            files: files.clone(),
        }
    }

    pub fn write(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn read(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn snapshot(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// `ls`: every path not starting with `.`.
    pub fn list_visible(&self, dir: &str) -> String {
        if let Some(err) = reject_directory(dir) {
            return err;
        }
        let listing = self
            .files
            .keys()
            .filter(|path| !path.starts_with(HIDDEN_PREFIX))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        listing.trim_end().to_string()
    }

    /// `ls -a`: every path, hidden ones included, in lexicographic order.
    pub fn list_all(&self, dir: &str) -> String {
        if let Some(err) = reject_directory(dir) {
            return err;
        }
        let mut paths: Vec<&str> = self.files.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths.join("\n")
    }

    pub fn find(&self, patterns: &[String]) -> String {
        let Some(pattern) = patterns.first() else {
            return "find: missing search pattern".to_string();
        };
        let matches: Vec<&str> = self
            .files
            .keys()
            .filter(|path| path.contains(pattern.as_str()))
            .map(String::as_str)
            .collect();
        if matches.is_empty() {
            return format!("No files found matching: {pattern}");
        }
        matches.join("\n")
    }

    /// Lines of `path` containing `pattern`. No match yields an empty string.
    pub fn grep(&self, pattern: &str, path: &str) -> String {
        let Some(content) = self.read(path) else {
            return format!("grep: {path}: No such file or directory");
        };
        content
            .lines()
            .filter(|line| line.contains(pattern))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn extract_strings(&self, path: &str) -> String {
        match self.read(path) {
            Some(content) => content.to_string(),
            None => format!("strings: {path}: No such file or directory"),
        }
    }

    pub fn decode_base64(&self, path: &str) -> String {
        let Some(content) = self.read(path) else {
            return format!("base64: {path}: No such file or directory");
        };
        match STANDARD.decode(content.trim()) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                log::debug!("base64 decode of {path} failed: {err}");
                "base64: invalid input".to_string()
            }
        }
    }
}

fn reject_directory(dir: &str) -> Option<String> {
    if dir.is_empty() || dir == "." {
        None
    } else {
        Some(format!("ls: {dir}: No such directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fs(files: &[(&str, &str)]) -> VirtualFs {
        let mut fs = VirtualFs::new();
        for (path, content) in files {
            fs.write(*path, *content);
        }
        fs
    }

    #[test]
    fn write_overwrites_existing_path() {
        let mut vfs = fs(&[("a", "one")]);
        vfs.write("a", "two");
        assert_eq!(vfs.read("a"), Some("two"));
        assert_eq!(vfs.len(), 1);
    }

    #[test]
    fn read_is_exact_and_case_sensitive() {
        let vfs = fs(&[("Readme", "x")]);
        assert_eq!(vfs.read("readme"), None);
        assert_eq!(vfs.read("Read"), None);
        assert_eq!(vfs.read("Readme"), Some("x"));
    }

    #[test]
    fn ls_hides_dot_files_and_ls_all_sorts_everything() {
        let vfs = fs(&[("visible.txt", "v"), (".hidden", "h"), ("b", "b")]);
        let visible = vfs.list_visible(".");
        assert!(!visible.contains(".hidden"));
        assert!(visible.contains("visible.txt"));
        assert_eq!(vfs.list_all(""), ".hidden\nb\nvisible.txt");
    }

    #[test]
    fn listing_only_accepts_the_root() {
        let vfs = fs(&[("dir1/file", "x")]);
        assert_eq!(vfs.list_visible("dir1"), "ls: dir1: No such directory");
        assert_eq!(vfs.list_all("/tmp"), "ls: /tmp: No such directory");
    }

    #[test]
    fn find_uses_first_pattern_as_substring() {
        let vfs = fs(&[("dir1/dir2/secret", "s"), ("dir4/another.txt", "a")]);
        assert_eq!(
            vfs.find(&["secret".to_string(), "another".to_string()]),
            "dir1/dir2/secret"
        );
        assert_eq!(vfs.find(&[]), "find: missing search pattern");
        assert_eq!(
            vfs.find(&["zzz".to_string()]),
            "No files found matching: zzz"
        );
    }

    #[test]
    fn grep_returns_matching_lines_or_nothing() {
        let vfs = fs(&[("log", "alpha\nPassword: x\nbeta\nPassword: y")]);
        assert_eq!(vfs.grep("Password", "log"), "Password: x\nPassword: y");
        assert_eq!(vfs.grep("gamma", "log"), "");
        assert_eq!(
            vfs.grep("x", "nope"),
            "grep: nope: No such file or directory"
        );
    }

    #[test]
    fn strings_returns_raw_content() {
        let vfs = fs(&[("bin", "\u{2190} junk key{1} junk")]);
        assert_eq!(vfs.extract_strings("bin"), "\u{2190} junk key{1} junk");
        assert_eq!(
            vfs.extract_strings("missing"),
            "strings: missing: No such file or directory"
        );
    }

    #[test]
    fn base64_decodes_verbatim_or_reports_invalid_input() {
        let vfs = fs(&[("ok", "aGVsbG8K"), ("bad", "not base64!!")]);
        assert_eq!(vfs.decode_base64("ok"), "hello\n");
        assert_eq!(vfs.decode_base64("bad"), "base64: invalid input");
        assert_eq!(
            vfs.decode_base64("gone"),
            "base64: gone: No such file or directory"
        );
    }
}
