/// Split a slash-delimited id into normalised segments.
///
/// Backslashes are treated as separators, `.` and empty segments vanish and
/// `..` consumes the preceding segment when there is one.
fn segments(path: &str) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for segment in path.replace('\\', "/").split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if result.last().is_some_and(|last| last != "..") {
                    result.pop();
                } else {
                    result.push(segment.to_string());
                }
            }
            _ => result.push(segment.to_string()),
        }
    }
    result
}

/// Path leading from the directory containing `anchor` to `target`.
///
/// Both arguments are canonical module ids. The result always uses forward
/// slashes and never starts with `./`.
pub fn relative_path(anchor: &str, target: &str) -> String {
    let mut from = segments(anchor);
    from.pop();
    let to = segments(target);

    let common = from
        .iter()
        .zip(&to)
        .take_while(|(left, right)| left == right)
        .count();

    let mut parts: Vec<&str> = Vec::with_capacity(from.len() - common + to.len() - common);
    parts.extend(std::iter::repeat_n("..", from.len() - common));
    parts.extend(to[common..].iter().map(String::as_str));
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::relative_path;

    #[test]
    fn sibling_of_top_level_entry() {
        assert_eq!(relative_path("a", "b.png"), "b.png");
        assert_eq!(relative_path("./a.css", "./b.png"), "b.png");
    }

    #[test]
    fn walks_up_out_of_entry_directory() {
        assert_eq!(relative_path("styles/main.css", "images/logo.png"), "../images/logo.png");
        assert_eq!(relative_path("a/b/c.css", "a/x.png"), "../x.png");
    }

    #[test]
    fn descends_below_entry_directory() {
        assert_eq!(relative_path("styles/main.css", "styles/img/x.png"), "img/x.png");
    }

    #[test]
    fn normalises_dot_segments_and_backslashes() {
        assert_eq!(relative_path("styles/./main.css", "styles/fonts/../img\\x.png"), "img/x.png");
    }
}
