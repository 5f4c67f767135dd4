//! Identifier extraction from buffers and ctags tag files.

use crate::database::FiletypeIdentifierMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagsError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type TagsResult<T> = Result<T, TagsError>;

/// Line comments (`//`, `#`), block comments, triple-quoted strings, then
/// single- and double-quoted strings with backslash escapes.
static COMMENT_AND_STRING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?m)//.*?$"#,
        r#"|#.*?$"#,
        r#"|(?s:/\*.*?\*/)"#,
        r#"|(?s:'''.*?''')"#,
        r#"|(?s:""".*?""")"#,
        r#"|'(?:\\\\|\\'|[^'\n])*?'"#,
        r#"|"(?:\\\\|\\"|[^"\n])*?""#,
    ))
    .expect("comment/string regex is valid")
});

static IDENTIFIER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[_a-zA-Z][_a-zA-Z0-9]*").expect("identifier regex is valid"));

/// `name<TAB>path<TAB>...language:<Lang>...`
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([^\t\n\r]+)\t([^\t\n\r]+)\t.*?language:([^\t\n\r]+).*?$")
        .expect("tag regex is valid")
});

/// ctags language name -> filetype
static LANG_TO_FILETYPE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Ant", "ant"),
        ("Asm", "asm"),
        ("Awk", "awk"),
        ("Basic", "basic"),
        ("C++", "cpp"),
        ("C#", "cs"),
        ("C", "c"),
        ("COBOL", "cobol"),
        ("DosBatch", "dosbatch"),
        ("Eiffel", "eiffel"),
        ("Elixir", "elixir"),
        ("Erlang", "erlang"),
        ("Fortran", "fortran"),
        ("Go", "go"),
        ("HTML", "html"),
        ("Java", "java"),
        ("JavaScript", "javascript"),
        ("Lisp", "lisp"),
        ("Lua", "lua"),
        ("Make", "make"),
        ("MatLab", "matlab"),
        ("ObjectiveC", "objc"),
        ("OCaml", "ocaml"),
        ("Pascal", "pascal"),
        ("Perl", "perl"),
        ("PHP", "php"),
        ("Python", "python"),
        ("REXX", "rexx"),
        ("Ruby", "ruby"),
        ("Rust", "rust"),
        ("Scheme", "scheme"),
        ("Sh", "sh"),
        ("SLang", "slang"),
        ("SML", "sml"),
        ("SQL", "sql"),
        ("Tcl", "tcl"),
        ("Tex", "tex"),
        ("TypeScript", "typescript"),
        ("Vera", "vera"),
        ("Verilog", "verilog"),
        ("VHDL", "vhdl"),
        ("Vim", "vim"),
        ("YACC", "yacc"),
    ])
});

pub fn filetype_for_ctags_language(language: &str) -> Option<&'static str> {
    LANG_TO_FILETYPE.get(language).copied()
}

/// Blank out comments and string literals so their words are not collected.
pub fn remove_identifier_free_text(text: &str) -> String {
    COMMENT_AND_STRING_REGEX.replace_all(text, " ").into_owned()
}

/// Every identifier-shaped token in `text`, in order of appearance.
pub fn extract_identifiers_from_text(text: &str) -> Vec<String> {
    IDENTIFIER_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Parse ctags output. Tags in languages without a known filetype are
/// skipped; relative paths are resolved against the tag file's directory.
pub fn extract_identifiers_from_tags_text(contents: &str, tag_file_dir: &Path) -> FiletypeIdentifierMap {
    let mut map = FiletypeIdentifierMap::new();

    for caps in TAG_REGEX.captures_iter(contents) {
        let language = caps[3].trim();
        let Some(filetype) = filetype_for_ctags_language(language) else {
            continue;
        };

        let path = Path::new(&caps[2]);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            tag_file_dir.join(path)
        };

        map.entry(filetype.to_string())
            .or_default()
            .entry(path.to_string_lossy().into_owned())
            .or_default()
            .push(caps[1].to_string());
    }

    map
}

pub fn extract_identifiers_from_tags_file(path: &Path) -> TagsResult<FiletypeIdentifierMap> {
    let bytes = fs::read(path).map_err(|source| TagsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let contents = String::from_utf8_lossy(&bytes);
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(extract_identifiers_from_tags_text(&contents, dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── comment and string removal ───────────────────────────────

    #[test]
    fn test_removes_line_comments() {
        let text = "foo // bar baz\nqux # quux\nend";
        let stripped = remove_identifier_free_text(text);
        assert_eq!(extract_identifiers_from_text(&stripped), vec!["foo", "qux", "end"]);
    }

    #[test]
    fn test_removes_block_comments() {
        let text = "foo /* bar\n baz */ qux";
        let stripped = remove_identifier_free_text(text);
        assert_eq!(extract_identifiers_from_text(&stripped), vec!["foo", "qux"]);
    }

    #[test]
    fn test_removes_quoted_strings() {
        let text = r#"foo "bar \" baz" qux 'zoo\'s' end"#;
        let stripped = remove_identifier_free_text(text);
        assert_eq!(extract_identifiers_from_text(&stripped), vec!["foo", "qux", "end"]);
    }

    #[test]
    fn test_removes_triple_quoted_strings() {
        let text = "foo = \"\"\"doc\nstring\"\"\"\nbar = '''x\ny'''\nbaz";
        let stripped = remove_identifier_free_text(text);
        assert_eq!(extract_identifiers_from_text(&stripped), vec!["foo", "bar", "baz"]);
    }

    // ── identifier extraction ────────────────────────────────────

    #[test]
    fn test_extract_identifiers() {
        assert_eq!(
            extract_identifiers_from_text("foo(bar_1, _baz) + 42 - 3x"),
            vec!["foo", "bar_1", "_baz", "x"]
        );
    }

    #[test]
    fn test_extract_identifiers_ignores_non_ascii_letters() {
        assert_eq!(extract_identifiers_from_text("café naïve"), vec!["caf", "na", "ve"]);
    }

    // ── tag files ────────────────────────────────────────────────

    #[test]
    fn test_tags_map_languages_to_filetypes() {
        let contents = concat!(
            "!_TAG_FILE_FORMAT\t2\t/extended format/\n",
            "foosy\tfoo\t/^foosy$/;\"\tkind:f\tlanguage:C++\n",
            "bloa\tfoo\t/^bloa$/;\"\tlanguage:C++\n",
            "i1\t/abs/bar\t/^i1$/;\"\tlanguage:Java\n",
            "zoo\tzoo.x\t/^zoo$/;\"\tlanguage:Klingon\n",
        );
        let map = extract_identifiers_from_tags_text(contents, Path::new("/dir"));
        assert_eq!(map.len(), 2);
        let foo = Path::new("/dir").join("foo").to_string_lossy().into_owned();
        assert_eq!(map["cpp"][&foo], vec!["foosy", "bloa"]);
        assert_eq!(map["java"]["/abs/bar"], vec!["i1"]);
    }

    #[test]
    fn test_missing_tags_file_is_an_error() {
        let err = extract_identifiers_from_tags_file(Path::new("/definitely/not/here/tags"));
        assert!(matches!(err, Err(TagsError::Io { .. })));
    }
}
