const SLIDE_BREAK: &str = "\x00SLIDE_BREAK\x00";

/// Split a deck body (after the header) into raw slide strings.
///
/// Slides break on a `---` line with blank lines on both sides, or on three
/// or more consecutive blank lines. Separators inside fenced code are text.
pub fn split(body: &str) -> Vec<String> {
    let body = body.replace("\r\n", "\n");
    let lines: Vec<&str> = body.split('\n').collect();

    let mut marked: Vec<&str> = Vec::new();
    let mut fence = Fence::default();
    let mut blank_run = 0;
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();
        if fence.update(trimmed) {
            blank_run = 0;
            marked.push(line);
            i += 1;
            continue;
        }

        if is_dash_separator(trimmed) {
            let prev_blank = marked
                .last()
                .is_none_or(|l| l.trim().is_empty() || *l == SLIDE_BREAK);
            let next_blank = lines.get(i + 1).is_none_or(|l| l.trim().is_empty());
            if prev_blank && next_blank {
                while marked.last().is_some_and(|l| l.trim().is_empty()) {
                    marked.pop();
                }
                marked.push(SLIDE_BREAK);
                blank_run = 0;
                i += 2;
                continue;
            }
        }

        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run == 3 {
                marked.pop();
                marked.pop();
                marked.push(SLIDE_BREAK);
            } else if blank_run < 3 {
                marked.push(line);
            }
        } else {
            blank_run = 0;
            marked.push(line);
        }
        i += 1;
    }

    marked
        .join("\n")
        .split(SLIDE_BREAK)
        .map(|chunk| chunk.trim().to_string())
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

/// Split one slide into its state sections on `@state` lines. A slide
/// without markers has a single state.
pub fn split_states(slide: &str) -> Vec<String> {
    let mut sections = vec![String::new()];
    let mut fence = Fence::default();
    for line in slide.lines() {
        let trimmed = line.trim();
        let in_code = fence.update(trimmed);
        if !in_code && trimmed == "@state" {
            sections.push(String::new());
            continue;
        }
        if let Some(current) = sections.last_mut() {
            current.push_str(line);
            current.push('\n');
        }
    }

    // A marker before any content starts the first state rather than a
    // second one.
    if sections.len() > 1 && sections[0].trim().is_empty() {
        sections.remove(0);
    }
    sections
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect()
}

/// Tracks fenced code blocks line by line.
#[derive(Debug, Default)]
pub(crate) struct Fence {
    open: Option<(char, usize)>,
}

impl Fence {
    pub(crate) fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next trimmed line. Returns whether the line belongs to a
    /// code block, fences included.
    pub(crate) fn update(&mut self, trimmed: &str) -> bool {
        match self.open {
            Some((ch, len)) => {
                let run = trimmed.chars().take_while(|&c| c == ch).count();
                if run >= len && trimmed.chars().skip(run).all(char::is_whitespace) {
                    self.open = None;
                }
                true
            }
            None => {
                let ch = match trimmed.chars().next() {
                    Some(c @ ('`' | '~')) => c,
                    _ => return false,
                };
                let run = trimmed.chars().take_while(|&c| c == ch).count();
                if run >= 3 {
                    self.open = Some((ch, run));
                    true
                } else {
                    false
                }
            }
        }
    }
}

fn is_dash_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_split() {
        let slides = split("Slide one\n\n\n\nSlide two");
        assert_eq!(slides, vec!["Slide one", "Slide two"]);
    }

    #[test]
    fn test_dash_separator() {
        let slides = split("Slide one\n\n---\n\nSlide two");
        assert_eq!(slides, vec!["Slide one", "Slide two"]);
    }

    #[test]
    fn test_dash_without_blank_lines_is_text() {
        let slides = split("Slide one\n---\nstill one");
        assert_eq!(slides.len(), 1);
    }

    #[test]
    fn test_combined_separators() {
        let slides = split("Slide one\n\n\n\n---\n\n\n\nSlide two");
        assert_eq!(slides.len(), 2);
    }

    #[test]
    fn test_headings_do_not_split() {
        let slides = split("# First\n\nContent\n\n# Second\n\nMore");
        assert_eq!(slides.len(), 1);
    }

    #[test]
    fn test_separator_in_code_block_is_text() {
        let slides = split("```yaml\n\n---\n\nkey: value\n```");
        assert_eq!(slides.len(), 1);
    }

    #[test]
    fn test_split_states() {
        let states = split_states("# Parts\n\n![](a.jpg)\n\n@state\n\n- resistor\n- LED");
        assert_eq!(states, vec!["# Parts\n\n![](a.jpg)", "- resistor\n- LED"]);
    }

    #[test]
    fn test_leading_state_marker() {
        let states = split_states("@state\nfirst\n@state\nsecond");
        assert_eq!(states, vec!["first", "second"]);
    }

    #[test]
    fn test_single_state() {
        assert_eq!(split_states("just text"), vec!["just text"]);
    }

    #[test]
    fn test_state_marker_in_code_is_text() {
        let states = split_states("```\n@state\n```");
        assert_eq!(states.len(), 1);
    }
}
