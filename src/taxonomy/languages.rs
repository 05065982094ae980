use std::collections::HashMap;
use std::sync::LazyLock;

static LANGUAGE_BY_EXTENSION: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("rs", "Rust"),
        ("py", "Python"),
        ("pyw", "Python"),
        ("ipynb", "Jupyter Notebook"),
        ("js", "JavaScript"),
        ("mjs", "JavaScript"),
        ("cjs", "JavaScript"),
        ("jsx", "JavaScript"),
        ("ts", "TypeScript"),
        ("tsx", "TypeScript"),
        ("go", "Go"),
        ("java", "Java"),
        ("kt", "Kotlin"),
        ("scala", "Scala"),
        ("c", "C"),
        ("h", "C"),
        ("cpp", "C++"),
        ("cc", "C++"),
        ("hpp", "C++"),
        ("cs", "C#"),
        ("swift", "Swift"),
        ("rb", "Ruby"),
        ("php", "PHP"),
        ("ex", "Elixir"),
        ("dart", "Dart"),
        ("vue", "Vue"),
        ("svelte", "Svelte"),
    ]
    .into_iter()
    .collect()
});

/// Programming language of a source path, by extension. Config, docs and
/// data files yield `None`.
pub fn detect_language(filename: &str) -> Option<&'static str> {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    if name.to_lowercase().ends_with(".d.ts") {
        return Some("TypeScript");
    }
    let (_, extension) = name.rsplit_once('.')?;
    LANGUAGE_BY_EXTENSION
        .get(extension.to_lowercase().as_str())
        .copied()
}

pub fn is_javascript_family(language: Option<&str>) -> bool {
    matches!(
        language.map(|l| l.to_lowercase()).as_deref(),
        Some("typescript") | Some("javascript")
    )
}

/// Source extensions worth sampling for a repository whose primary
/// language is `language`.
pub fn code_extensions(language: Option<&str>) -> &'static [&'static str] {
    match language.map(|l| l.to_lowercase()).as_deref() {
        Some("typescript") | Some("javascript") => &["ts", "tsx", "js", "jsx"],
        Some("python") => &["py"],
        Some("go") => &["go"],
        Some("rust") => &["rs"],
        Some("java") => &["java"],
        _ => &["py", "ts", "tsx", "js", "jsx", "go", "rs", "java"],
    }
}

/// Most frequent language across `paths`, used when GitHub reports none.
pub fn dominant_language<'a>(paths: impl IntoIterator<Item = &'a str>) -> Option<&'static str> {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for path in paths {
        if let Some(lang) = detect_language(path) {
            *counts.entry(lang).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(lang, _)| lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("src/main.rs"), Some("Rust"));
        assert_eq!(detect_language("app.py"), Some("Python"));
        assert_eq!(detect_language("web/index.tsx"), Some("TypeScript"));
        assert_eq!(detect_language("types.d.ts"), Some("TypeScript"));
        assert_eq!(detect_language("README.md"), None);
        assert_eq!(detect_language("Dockerfile"), None);
    }

    #[test]
    fn test_code_extensions() {
        assert_eq!(code_extensions(Some("Python")), &["py"]);
        assert!(code_extensions(Some("TypeScript")).contains(&"tsx"));
        assert_eq!(code_extensions(None).len(), 8);
    }

    #[test]
    fn test_dominant_language() {
        let paths = ["a.py", "b.py", "c.ts", "README.md"];
        assert_eq!(dominant_language(paths), Some("Python"));
        assert_eq!(dominant_language(["README.md"]), None);
    }
}
