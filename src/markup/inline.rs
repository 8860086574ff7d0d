use crate::model::{RunStyle, StyledRun};

/// Split one line into `**bold**` / `*italic*` runs.
///
/// The nearest `*` decides the marker: if it begins a `**` the span is bold,
/// otherwise italic. An opening marker without a closing partner turns the
/// whole remainder of the line, marker included, into one literal run.
pub fn split_styled_runs(line: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut rest = line;

    while !rest.is_empty() {
        let Some(start) = rest.find('*') else {
            runs.push(StyledRun::new(rest, RunStyle::Normal));
            break;
        };
        if start > 0 {
            runs.push(StyledRun::new(&rest[..start], RunStyle::Normal));
        }

        let (marker, style) = if rest[start..].starts_with("**") {
            ("**", RunStyle::Bold)
        } else {
            ("*", RunStyle::Italic)
        };
        let body_start = start + marker.len();

        match rest[body_start..].find(marker) {
            Some(len) => {
                runs.push(StyledRun::new(&rest[body_start..body_start + len], style));
                rest = &rest[body_start + len + marker.len()..];
            }
            None => {
                runs.push(StyledRun::new(&rest[start..], RunStyle::Normal));
                break;
            }
        }
    }

    runs
}
