// 文檔：有序的行序列、結構性編輯與文件讀寫

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::row::Row;
use crate::syntax::Syntax;

pub struct Document {
    rows: Vec<Row>,
    dirty: bool,
    filename: Option<PathBuf>,
    syntax: Option<&'static Syntax>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            dirty: false,
            filename: None,
            syntax: None,
        }
    }

    /// 打開文件。文件不存在視為新文件，從空文檔開始（首次使用的預期行為）。
    pub fn open(path: &Path) -> Result<Self> {
        let mut document = Self::new();
        document.filename = Some(path.to_path_buf());

        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            document.load(contents.lines());
            log::debug!("opened {} ({} lines)", path.display(), document.rows.len());
        } else {
            log::debug!("new file: {}", path.display());
        }

        document.select_syntax();
        Ok(document)
    }

    /// 以給定的行序列取代全部內容並清除 dirty
    pub fn load<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        self.rows = lines
            .into_iter()
            .enumerate()
            .map(|(index, text)| Row::new(index, text))
            .collect();
        self.dirty = false;
        self.rehighlight_all();
    }

    /// 依當前文件名重新查找語法定義並全量重新派生
    pub fn select_syntax(&mut self) {
        self.syntax = self
            .filename
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .and_then(Syntax::select);
        self.rehighlight_all();
    }

    pub fn line_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, y: usize) -> Option<&Row> {
        self.rows.get(y)
    }

    pub fn row_mut(&mut self, y: usize) -> Option<&mut Row> {
        self.rows.get_mut(y)
    }

    pub fn line_len(&self, y: usize) -> usize {
        self.rows.get(y).map_or(0, Row::len)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn set_filename(&mut self, path: &Path) {
        self.filename = Some(path.to_path_buf());
        self.select_syntax();
    }

    /// 狀態欄顯示用的文件名
    pub fn file_name(&self) -> String {
        self.filename
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("[No Name]")
            .to_string()
    }

    pub fn syntax(&self) -> Option<&'static Syntax> {
        self.syntax
    }

    /// 在 (x, y) 插入字符。y 等於行數時代表附加位置，先補一個空行。
    pub fn insert_char(&mut self, x: usize, y: usize, c: char) {
        if y == self.rows.len() {
            self.rows.push(Row::new(y, ""));
        }
        self.rows[y].insert_char(x, c);
        self.dirty = true;
        self.rehighlight_from(y);
    }

    /// 在 (x, y) 斷行：x 為 0 時在當前行上方插入空行，否則把本行拆成兩行
    pub fn insert_newline(&mut self, x: usize, y: usize) {
        if y == self.rows.len() {
            self.rows.push(Row::new(y, ""));
        } else if x == 0 {
            self.rows.insert(y, Row::new(y, ""));
        } else {
            let rest = self.rows[y].split_off(x);
            self.rows.insert(y + 1, Row::new(y + 1, &rest));
        }
        self.renumber_from(y);
        self.dirty = true;
        self.rehighlight_from(y);
    }

    /// 刪除 (x, y) 前的一個字符，x 為 0 時把本行併回上一行。
    /// 返回刪除後的光標位置；文檔開頭與行數之外都是 no-op。
    pub fn delete_char(&mut self, x: usize, y: usize) -> (usize, usize) {
        if y >= self.rows.len() || (x == 0 && y == 0) {
            return (x, y);
        }

        if x > 0 {
            self.rows[y].delete_char(x - 1);
            self.dirty = true;
            self.rehighlight_from(y);
            (x - 1, y)
        } else {
            let merged = self.rows.remove(y);
            let prev_len = self.rows[y - 1].len();
            self.rows[y - 1].append_str(merged.chars());
            self.renumber_from(y - 1);
            self.dirty = true;
            self.rehighlight_from(y - 1);
            (prev_len, y - 1)
        }
    }

    /// 把每行原始文本加換行符寫入文件，成功後清除 dirty，返回寫入字節數
    pub fn save(&mut self) -> Result<usize> {
        let path = self.filename.clone().context("No file name set")?;

        let mut contents = String::new();
        for row in &self.rows {
            contents.push_str(row.chars());
            contents.push('\n');
        }

        fs::write(&path, contents.as_bytes())
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        self.dirty = false;
        Ok(contents.len())
    }

    fn renumber_from(&mut self, start: usize) {
        for i in start..self.rows.len() {
            self.rows[i].set_index(i);
        }
    }

    // 全量重新派生：註解狀態必須從頭開始傳遞
    fn rehighlight_all(&mut self) {
        let mut prev_open = false;
        for i in 0..self.rows.len() {
            prev_open = self.rows[i].update(self.syntax, prev_open);
        }
    }

    // 有界的重新派生：從 start 往下，一旦某行的註解狀態與修改前相同就停止，
    // 代價被限制在實際受影響的後綴
    fn rehighlight_from(&mut self, start: usize) {
        let mut prev_open = start > 0 && self.rows[start - 1].open_comment();
        for i in start..self.rows.len() {
            let before = self.rows[i].open_comment();
            let after = self.rows[i].update(self.syntax, prev_open);
            if i > start && after == before {
                break;
            }
            prev_open = after;
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Highlight;
    use tempfile::TempDir;

    fn doc_from(lines: &[&str]) -> Document {
        let mut document = Document::new();
        document.load(lines.iter().copied());
        document
    }

    fn c_doc(lines: &[&str]) -> Document {
        let mut document = doc_from(lines);
        document.set_filename(Path::new("test.c"));
        document
    }

    #[test]
    fn load_assigns_sequential_indices() {
        let document = doc_from(&["one", "two", "three"]);
        assert_eq!(document.line_count(), 3);
        for i in 0..3 {
            assert_eq!(document.row(i).unwrap().index(), i);
        }
        assert!(!document.is_dirty());
    }

    #[test]
    fn insert_char_at_append_position_creates_row() {
        let mut document = Document::new();
        document.insert_char(0, 0, 'a');
        assert_eq!(document.line_count(), 1);
        assert_eq!(document.row(0).unwrap().chars(), "a");
        assert!(document.is_dirty());
    }

    #[test]
    fn split_then_merge_restores_line() {
        let mut document = doc_from(&["hello world"]);
        document.insert_newline(5, 0);
        assert_eq!(document.line_count(), 2);
        assert_eq!(document.row(0).unwrap().chars(), "hello");
        assert_eq!(document.row(1).unwrap().chars(), " world");
        assert_eq!(document.row(1).unwrap().index(), 1);

        let (x, y) = document.delete_char(0, 1);
        assert_eq!((x, y), (5, 0));
        assert_eq!(document.line_count(), 1);
        assert_eq!(document.row(0).unwrap().chars(), "hello world");
    }

    #[test]
    fn newline_at_column_zero_inserts_empty_row_above() {
        let mut document = doc_from(&["abc"]);
        document.insert_newline(0, 0);
        assert_eq!(document.row(0).unwrap().chars(), "");
        assert_eq!(document.row(1).unwrap().chars(), "abc");
        assert_eq!(document.row(1).unwrap().index(), 1);
    }

    #[test]
    fn delete_at_document_start_is_noop() {
        let mut document = doc_from(&["abc"]);
        assert_eq!(document.delete_char(0, 0), (0, 0));
        assert_eq!(document.row(0).unwrap().chars(), "abc");
        assert!(!document.is_dirty());
        // 行數之外同樣是 no-op
        assert_eq!(document.delete_char(0, 5), (0, 5));
    }

    #[test]
    fn open_comment_state_carries_to_following_rows() {
        let document = c_doc(&["/* open", "still inside", "closed */ x"]);
        assert!(document.row(0).unwrap().open_comment());
        assert!(document.row(1).unwrap().open_comment());
        assert!(!document.row(2).unwrap().open_comment());
        assert!(document
            .row(1)
            .unwrap()
            .highlight()
            .iter()
            .all(|&h| h == Highlight::MlComment));
    }

    #[test]
    fn closing_comment_rehighlights_dependent_rows() {
        let mut document = c_doc(&["/* open", "int x;"]);
        assert_eq!(document.row(1).unwrap().highlight()[0], Highlight::MlComment);

        // 在第一行尾端補上閉合標記，第二行必須重新分類
        let len = document.line_len(0);
        document.insert_char(len, 0, '*');
        document.insert_char(len + 1, 0, '/');
        assert!(!document.row(0).unwrap().open_comment());
        assert_eq!(document.row(1).unwrap().highlight()[0], Highlight::Keyword2);
    }

    #[test]
    fn save_writes_lines_and_clears_dirty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        let mut document = doc_from(&["hello", "world"]);
        document.set_filename(&path);
        document.insert_char(5, 0, '!');
        assert!(document.is_dirty());

        let bytes = document.save().unwrap();
        assert_eq!(bytes, "hello!\nworld\n".len());
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello!\nworld\n");
        assert!(!document.is_dirty());
    }

    #[test]
    fn save_without_filename_fails_and_stays_dirty() {
        let mut document = doc_from(&["x"]);
        document.insert_char(1, 0, 'y');
        assert!(document.save().is_err());
        assert!(document.is_dirty());
    }

    #[test]
    fn open_missing_file_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("does-not-exist.c");

        let document = Document::open(&path).unwrap();
        assert_eq!(document.line_count(), 0);
        assert!(!document.is_dirty());
        assert_eq!(document.file_name(), "does-not-exist.c");
        // 語法仍依文件名選定，方便第一次存檔後立即高亮
        assert_eq!(document.syntax().unwrap().filetype, "c/c++");
    }

    #[test]
    fn open_reads_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hello.py");
        fs::write(&path, "def f():\n    return 1\n").unwrap();

        let document = Document::open(&path).unwrap();
        assert_eq!(document.line_count(), 2);
        assert_eq!(document.row(0).unwrap().chars(), "def f():");
        assert_eq!(document.syntax().unwrap().filetype, "python");
        assert!(!document.is_dirty());
    }
}
