//! Textual inclusion directives
//!
//! Nim's `include` pastes another file into the current one; those files are
//! part of the compiled unit. `import` is not followed.

/// File names named by `include` statements, in source order.
///
/// Handles `include a, b`, quoted paths, and the `dir/[a, b]` group form.
/// Names without an extension get `.nim`.
pub fn parse_includes(content: &str) -> Vec<String> {
    let mut out = Vec::new();
    for line in content.lines() {
        let line = strip_comment(line).trim();
        let Some(rest) = line.strip_prefix("include") else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }
        for item in split_items(rest.trim()) {
            for name in expand_group(&item) {
                out.push(with_extension(&name));
            }
        }
    }
    out
}

fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Split on commas that are not inside `[...]` or quotes
fn split_items(list: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_string = false;
    for c in list.chars() {
        match c {
            '"' => in_string = !in_string,
            '[' if !in_string => depth += 1,
            ']' if !in_string => depth = depth.saturating_sub(1),
            ',' if !in_string && depth == 0 => {
                push_item(&mut items, &current);
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    push_item(&mut items, &current);
    items
}

fn push_item(items: &mut Vec<String>, raw: &str) {
    let item: String = raw.trim().chars().filter(|c| *c != '"').collect();
    if !item.is_empty() {
        items.push(item);
    }
}

fn expand_group(item: &str) -> Vec<String> {
    let (Some(open), true) = (item.find('['), item.ends_with(']')) else {
        return vec![item.to_string()];
    };
    let prefix = &item[..open];
    item[open + 1..item.len() - 1]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("{prefix}{s}"))
        .collect()
}

fn with_extension(name: &str) -> String {
    let file = name.rsplit('/').next().unwrap_or(name);
    if file.contains('.') {
        name.to_string()
    } else {
        format!("{name}.nim")
    }
}
