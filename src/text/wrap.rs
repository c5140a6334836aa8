/// Greedy word wrap.
///
/// Words are whitespace-separated. The first word always starts a line; each following word is
/// appended (with one space) while the measured candidate stays strictly narrower than
/// `max_width`, otherwise the line is committed and the word starts a new one. A single word
/// wider than `max_width` is emitted whole. There is no line cap; callers truncate.
///
/// Empty or whitespace-only input yields one empty line.
pub fn wrap_text<M>(text: &str, max_width: f64, measure: M) -> Vec<String>
where
    M: Fn(&str) -> f64,
{
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return vec![String::new()];
    };

    let mut lines = Vec::new();
    let mut line = first.to_owned();
    for word in words {
        let candidate = format!("{line} {word}");
        if measure(&candidate) < max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_owned()));
        }
    }
    lines.push(line);
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
