/// Splits a command line into words.
///
/// `'` and `"` open a quoted run that only the same character closes; the other
/// quote character is taken literally inside it. An unterminated quote extends to
/// the end of the line. Unquoted whitespace separates words and empty words are
/// dropped, so `cat ""` is just `["cat"]`.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '\'' || ch == '"' => quote = Some(ch),
            None if ch.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(ch),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn double_quoted_filename_is_one_token() {
        assert_eq!(
            tokenize(r#"cat "file with spaces.txt""#),
            vec!["cat", "file with spaces.txt"]
        );
    }

    #[test]
    fn collapses_repeated_whitespace() {
        assert_eq!(tokenize("  ls   -a \t"), vec!["ls", "-a"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn other_quote_is_literal_inside_a_quoted_run() {
        assert_eq!(tokenize(r#"echo "it's""#), vec!["echo", "it's"]);
        assert_eq!(tokenize(r#"echo 'say "hi"'"#), vec!["echo", r#"say "hi""#]);
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_line() {
        assert_eq!(tokenize("cat 'file with"), vec!["cat", "file with"]);
    }

    #[test]
    fn quotes_join_adjacent_text_and_empty_words_vanish() {
        assert_eq!(tokenize(r#"cat a"b c"d"#), vec!["cat", "ab cd"]);
        assert_eq!(tokenize(r#"cat "" ''"#), vec!["cat"]);
    }
}
