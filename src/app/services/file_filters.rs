/// One entry in a native file chooser's filter list.
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

pub const OPEN_FILTERS: &[FileFilter] = &[
    FileFilter { name: "Source Code", extensions: &["c", "h", "cpp", "hpp", "py", "rs"] },
    FileFilter { name: "Text Files", extensions: &["txt", "md", "log"] },
    FileFilter { name: "Config Files", extensions: &["json", "toml", "yaml", "yml", "ini", "cfg"] },
    FileFilter { name: "Shell Scripts", extensions: &["sh", "bash", "zsh"] },
];

/// Build an FLTK filter string: "Name\tPattern" lines joined by newlines.
///
/// A single extension gives `*.ext`, several give `*.{a,b}`.
/// An "All Files" entry always comes last.
pub fn filter_string(filters: &[FileFilter]) -> String {
    filters
        .iter()
        .filter(|f| !f.extensions.is_empty())
        .map(|f| format!("{}\t{}", f.name, pattern(f.extensions)))
        .chain(std::iter::once(ALL_FILES.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

const ALL_FILES: &str = "All Files\t*";

fn pattern(extensions: &[&str]) -> String {
    match extensions {
        [single] => format!("*.{}", single),
        many => format!("*.{{{}}}", many.join(",")),
    }
}
