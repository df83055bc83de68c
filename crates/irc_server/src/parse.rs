//! Tokenizes one already-framed line (no trailing CRLF) into a command
//! and its parameters, honoring the single `:`-introduced trailing
//! parameter. A linear, non-backtracking scan; no parser combinator
//! needed for a grammar this small.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub command: String,
    pub params: Vec<String>,
}

/// Splits on spaces; the first token is the command. Subsequent tokens
/// are positional params until one starts with `:`, at which point that
/// token (leading `:` stripped) and every remaining token are rejoined
/// with single spaces into one trailing param. Empty input yields an
/// empty command and no params.
pub fn parse_line(line: &str) -> ParsedLine {
    let mut tokens = line.split(' ').filter(|t| !t.is_empty());

    let command = tokens.next().unwrap_or("").to_string();
    let mut params = Vec::new();

    // split(' ') above already dropped empty fragments, so a trailing
    // param's internal single spaces only need rejoining once we find
    // the ':' token; re-scan the original string instead of the
    // filtered tokens to preserve them exactly.
    let rest = line
        .splitn(2, ' ')
        .nth(1)
        .unwrap_or("")
        .trim_start_matches(' ');
    let mut remaining = rest;
    loop {
        let remaining_trimmed = remaining.trim_start_matches(' ');
        if remaining_trimmed.is_empty() {
            break;
        }
        if let Some(stripped) = remaining_trimmed.strip_prefix(':') {
            // Collapse any internal runs of spaces: split dropping empty
            // fragments, then rejoin with single spaces, per spec.
            let collapsed = stripped
                .split(' ')
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            params.push(collapsed);
            break;
        }
        match remaining_trimmed.find(' ') {
            Some(idx) => {
                params.push(remaining_trimmed[..idx].to_string());
                remaining = &remaining_trimmed[idx + 1..];
            }
            None => {
                params.push(remaining_trimmed.to_string());
                break;
            }
        }
    }

    ParsedLine { command, params }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_param_round_trips() {
        let p = parse_line("PRIVMSG #x :a b c");
        assert_eq!(p.command, "PRIVMSG");
        assert_eq!(p.params, vec!["#x".to_string(), "a b c".to_string()]);
    }

    #[test]
    fn plain_params_without_trailing() {
        let p = parse_line("JOIN #chan key");
        assert_eq!(p.command, "JOIN");
        assert_eq!(p.params, vec!["#chan".to_string(), "key".to_string()]);
    }

    #[test]
    fn empty_line_yields_empty_command() {
        let p = parse_line("");
        assert_eq!(p.command, "");
        assert!(p.params.is_empty());
    }

    #[test]
    fn trailing_param_can_be_empty() {
        let p = parse_line("TOPIC #chan :");
        assert_eq!(p.params, vec!["#chan".to_string(), "".to_string()]);
    }

    #[test]
    fn leading_colon_with_no_plain_params() {
        let p = parse_line("PING :token");
        assert_eq!(p.command, "PING");
        assert_eq!(p.params, vec!["token".to_string()]);
    }

    #[test]
    fn trailing_param_collapses_internal_space_runs() {
        let p = parse_line("PRIVMSG #x :a  b");
        assert_eq!(p.params, vec!["#x".to_string(), "a b".to_string()]);
    }
}
