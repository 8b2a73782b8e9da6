//! Shell-style splitting of a single raw command line.

/// Splits `raw` on whitespace outside double quotes.
///
/// Each `"` toggles the in-quotes state. Pieces are trimmed, one matching
/// pair of surrounding quotes is stripped, and empty pieces are dropped, so a
/// quoted empty string (`""`) does not survive as an argument. An unmatched
/// quote simply runs to the end of the input.
///
/// # Examples
///
/// ```
/// use command_binder::split_command_line;
///
/// let args = split_command_line(r#"-my some -s2 "something -int 3" --sw"#);
/// assert_eq!(args, vec!["-my", "some", "-s2", "something -int 3", "--sw"]);
/// ```
pub fn split_command_line(raw: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in raw.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        }
        if !in_quotes && c.is_whitespace() {
            pieces.push(&raw[start..i]);
            start = i + c.len_utf8();
        }
    }
    pieces.push(&raw[start..]);

    pieces
        .into_iter()
        .map(|piece| trim_matching_quotes(piece.trim()))
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}

fn trim_matching_quotes(input: &str) -> &str {
    if input.len() >= 2 && input.starts_with('"') && input.ends_with('"') {
        &input[1..input.len() - 1]
    } else {
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_empty_string() {
        assert!(split_command_line("").is_empty());
        assert!(split_command_line("   ").is_empty());
    }

    #[test]
    fn test_split_collapses_runs_of_whitespace() {
        assert_eq!(
            split_command_line("restore \t --an   -p  linux"),
            vec!["restore", "--an", "-p", "linux"]
        );
    }

    #[test]
    fn test_split_drops_quoted_empty_string() {
        assert_eq!(split_command_line(r#"-my "" --sw"#), vec!["-my", "--sw"]);
    }

    #[test]
    fn test_split_unmatched_quote_runs_to_end() {
        assert_eq!(
            split_command_line(r#"-my "some thing --sw"#),
            vec!["-my", "\"some thing --sw"]
        );
    }

    #[test]
    fn test_split_keeps_inner_quotes_of_partially_quoted_word() {
        assert_eq!(
            split_command_line(r#"--name="a b" x"#),
            vec!["--name=\"a b\"", "x"]
        );
    }
}
