// 語法定義資料庫與高亮分類

use std::path::Path;

use crossterm::style::Color;
use once_cell::sync::Lazy;

/// 每個渲染字符的高亮分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Normal,
    Comment,
    /// 多行註解
    MlComment,
    /// 控制流關鍵字
    Keyword1,
    /// 類型關鍵字
    Keyword2,
    String,
    Number,
    /// 搜索匹配
    Match,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy)]
pub struct Keyword {
    pub text: &'static str,
    pub kind: KeywordKind,
}

const fn kw(text: &'static str) -> Keyword {
    Keyword {
        text,
        kind: KeywordKind::Primary,
    }
}

const fn ty(text: &'static str) -> Keyword {
    Keyword {
        text,
        kind: KeywordKind::Secondary,
    }
}

/// 一種語言的語法定義
#[derive(Debug)]
pub struct Syntax {
    pub filetype: &'static str,
    pub filematch: &'static [&'static str],
    pub keywords: &'static [Keyword],
    pub singleline_comment_start: Option<&'static str>,
    pub multiline_comment_start: Option<&'static str>,
    pub multiline_comment_end: Option<&'static str>,
    pub highlight_numbers: bool,
    pub highlight_strings: bool,
}

static C_KEYWORDS: &[Keyword] = &[
    // 控制流關鍵字
    kw("switch"),
    kw("if"),
    kw("while"),
    kw("for"),
    kw("break"),
    kw("continue"),
    kw("return"),
    kw("else"),
    kw("struct"),
    kw("union"),
    kw("typedef"),
    kw("static"),
    kw("enum"),
    kw("class"),
    kw("case"),
    kw("const"),
    kw("sizeof"),
    kw("volatile"),
    kw("auto"),
    kw("register"),
    kw("goto"),
    kw("do"),
    kw("namespace"),
    kw("using"),
    kw("template"),
    kw("typename"),
    kw("try"),
    kw("catch"),
    kw("throw"),
    kw("public"),
    kw("private"),
    kw("protected"),
    kw("virtual"),
    kw("override"),
    kw("final"),
    kw("explicit"),
    kw("inline"),
    kw("extern"),
    kw("friend"),
    kw("operator"),
    kw("new"),
    kw("delete"),
    kw("this"),
    kw("nullptr"),
    kw("true"),
    kw("false"),
    // 類型關鍵字
    ty("int"),
    ty("long"),
    ty("double"),
    ty("float"),
    ty("char"),
    ty("unsigned"),
    ty("signed"),
    ty("void"),
    ty("bool"),
    ty("short"),
    ty("size_t"),
    ty("uint8_t"),
    ty("uint16_t"),
    ty("uint32_t"),
    ty("uint64_t"),
    ty("int8_t"),
    ty("int16_t"),
    ty("int32_t"),
    ty("int64_t"),
    ty("std::string"),
    ty("std::vector"),
    ty("std::map"),
    ty("string"),
    ty("vector"),
    ty("map"),
];

static PYTHON_KEYWORDS: &[Keyword] = &[
    kw("and"),
    kw("as"),
    kw("assert"),
    kw("break"),
    kw("class"),
    kw("continue"),
    kw("def"),
    kw("del"),
    kw("elif"),
    kw("else"),
    kw("except"),
    kw("finally"),
    kw("for"),
    kw("from"),
    kw("global"),
    kw("if"),
    kw("import"),
    kw("in"),
    kw("is"),
    kw("lambda"),
    kw("nonlocal"),
    kw("not"),
    kw("or"),
    kw("pass"),
    kw("raise"),
    kw("return"),
    kw("try"),
    kw("while"),
    kw("with"),
    kw("yield"),
    kw("async"),
    kw("await"),
    ty("int"),
    ty("float"),
    ty("str"),
    ty("bool"),
    ty("list"),
    ty("dict"),
    ty("tuple"),
    ty("set"),
    ty("None"),
    ty("True"),
    ty("False"),
];

static RUST_KEYWORDS: &[Keyword] = &[
    kw("fn"),
    kw("let"),
    kw("mut"),
    kw("if"),
    kw("else"),
    kw("match"),
    kw("while"),
    kw("for"),
    kw("loop"),
    kw("break"),
    kw("continue"),
    kw("return"),
    kw("impl"),
    kw("trait"),
    kw("struct"),
    kw("enum"),
    kw("mod"),
    kw("pub"),
    kw("use"),
    kw("crate"),
    kw("self"),
    kw("super"),
    kw("where"),
    kw("async"),
    kw("await"),
    kw("move"),
    kw("ref"),
    kw("static"),
    kw("const"),
    kw("unsafe"),
    kw("dyn"),
    kw("in"),
    kw("as"),
    kw("true"),
    kw("false"),
    ty("i8"),
    ty("i16"),
    ty("i32"),
    ty("i64"),
    ty("i128"),
    ty("u8"),
    ty("u16"),
    ty("u32"),
    ty("u64"),
    ty("u128"),
    ty("f32"),
    ty("f64"),
    ty("isize"),
    ty("usize"),
    ty("bool"),
    ty("char"),
    ty("str"),
    ty("String"),
    ty("Vec"),
    ty("Option"),
    ty("Result"),
    ty("Box"),
];

static DATABASE: Lazy<Vec<Syntax>> = Lazy::new(|| {
    vec![
        Syntax {
            filetype: "c/c++",
            filematch: &[".c", ".h", ".cpp", ".hpp", ".cc", ".cxx"],
            keywords: C_KEYWORDS,
            singleline_comment_start: Some("//"),
            multiline_comment_start: Some("/*"),
            multiline_comment_end: Some("*/"),
            highlight_numbers: true,
            highlight_strings: true,
        },
        Syntax {
            filetype: "python",
            filematch: &[".py", ".pyw"],
            keywords: PYTHON_KEYWORDS,
            singleline_comment_start: Some("#"),
            multiline_comment_start: Some("\"\"\""),
            multiline_comment_end: Some("\"\"\""),
            highlight_numbers: true,
            highlight_strings: true,
        },
        Syntax {
            filetype: "rust",
            filematch: &[".rs"],
            keywords: RUST_KEYWORDS,
            singleline_comment_start: Some("//"),
            multiline_comment_start: Some("/*"),
            multiline_comment_end: Some("*/"),
            highlight_numbers: true,
            highlight_strings: true,
        },
    ]
});

impl Syntax {
    /// 依文件名查找語法定義，找不到時所有高亮退化為 Normal
    pub fn select(filename: &str) -> Option<&'static Syntax> {
        if filename.is_empty() {
            return None;
        }
        DATABASE.iter().find(|syntax| syntax.matches_filename(filename))
    }

    // 以 '.' 開頭的模式比對副檔名，其餘模式比對文件名子串
    fn matches_filename(&self, filename: &str) -> bool {
        let extension = Path::new(filename).extension().and_then(|e| e.to_str());
        self.filematch.iter().any(|pattern| match pattern.strip_prefix('.') {
            Some(want) => extension == Some(want),
            None => filename.contains(pattern),
        })
    }
}

/// 高亮分類對應的前景色
pub fn color_for(highlight: Highlight) -> Color {
    match highlight {
        Highlight::Comment | Highlight::MlComment => Color::Cyan,
        Highlight::Keyword1 => Color::Yellow,
        Highlight::Keyword2 => Color::Green,
        Highlight::String => Color::Magenta,
        Highlight::Number => Color::Red,
        Highlight::Match => Color::Blue,
        Highlight::Normal => Color::Reset,
    }
}

/// 關鍵字與數字邊界的分隔符
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\0' || ",.()+-/*=~%<>[];".contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_matches_extension_exactly() {
        assert_eq!(Syntax::select("main.c").unwrap().filetype, "c/c++");
        assert_eq!(Syntax::select("deep/path/row.hpp").unwrap().filetype, "c/c++");
        assert_eq!(Syntax::select("script.py").unwrap().filetype, "python");
        assert_eq!(Syntax::select("lib.rs").unwrap().filetype, "rust");
    }

    #[test]
    fn select_rejects_unknown_and_empty_filenames() {
        assert!(Syntax::select("notes.txt").is_none());
        assert!(Syntax::select("noextension").is_none());
        assert!(Syntax::select("").is_none());
        // 副檔名必須完全相等，"c" 不等於 "cc" 以外的前綴
        assert!(Syntax::select("archive.tar.gz").is_none());
    }

    #[test]
    fn non_dot_pattern_matches_substring() {
        let syntax = Syntax {
            filetype: "make",
            filematch: &["Makefile"],
            keywords: &[],
            singleline_comment_start: Some("#"),
            multiline_comment_start: None,
            multiline_comment_end: None,
            highlight_numbers: false,
            highlight_strings: false,
        };
        assert!(syntax.matches_filename("Makefile"));
        assert!(syntax.matches_filename("GNUMakefile.bak"));
        assert!(!syntax.matches_filename("makefile"));
    }

    #[test]
    fn keyword_kinds_follow_database() {
        let c = Syntax::select("x.c").unwrap();
        let int = c.keywords.iter().find(|k| k.text == "int").unwrap();
        assert_eq!(int.kind, KeywordKind::Secondary);
        let ifkw = c.keywords.iter().find(|k| k.text == "if").unwrap();
        assert_eq!(ifkw.kind, KeywordKind::Primary);
    }

    #[test]
    fn colors_follow_fixed_mapping() {
        assert_eq!(color_for(Highlight::Comment), Color::Cyan);
        assert_eq!(color_for(Highlight::MlComment), Color::Cyan);
        assert_eq!(color_for(Highlight::Keyword1), Color::Yellow);
        assert_eq!(color_for(Highlight::Keyword2), Color::Green);
        assert_eq!(color_for(Highlight::String), Color::Magenta);
        assert_eq!(color_for(Highlight::Number), Color::Red);
        assert_eq!(color_for(Highlight::Match), Color::Blue);
        assert_eq!(color_for(Highlight::Normal), Color::Reset);
    }

    #[test]
    fn separator_set_is_fixed() {
        for c in [' ', '\t', '\0', ',', '.', '(', ')', '+', '-', '/', '*', '=', '~', '%', '<', '>', '[', ']', ';'] {
            assert!(is_separator(c), "{c:?} should be a separator");
        }
        for c in ['a', 'Z', '0', '_', ':', '"', '\''] {
            assert!(!is_separator(c), "{c:?} should not be a separator");
        }
    }
}
