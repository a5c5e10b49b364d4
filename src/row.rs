// 單行文本：原始字符與派生的渲染/高亮投影

use crate::syntax::{self, Highlight, KeywordKind, Syntax};

const TAB_STOP: usize = 8;

/// 文檔中的一行。`render` 與 `highlight` 是派生狀態，
/// 任何修改 `chars` 的操作之後都必須經過 `update` 重新同步。
pub struct Row {
    index: usize,
    chars: String,
    render: String,
    highlight: Vec<Highlight>,
    open_comment: bool,
}

impl Row {
    pub fn new(index: usize, text: &str) -> Self {
        Self {
            index,
            chars: text.to_string(),
            render: String::new(),
            highlight: Vec::new(),
            open_comment: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// 字符數（而非字節數）
    pub fn len(&self) -> usize {
        self.chars.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &str {
        &self.chars
    }

    pub fn render(&self) -> &str {
        &self.render
    }

    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    /// 行尾是否留有未閉合的多行註解
    pub fn open_comment(&self) -> bool {
        self.open_comment
    }

    pub fn insert_char(&mut self, at: usize, c: char) {
        let at = at.min(self.len());
        let byte = byte_index(&self.chars, at);
        self.chars.insert(byte, c);
    }

    pub fn delete_char(&mut self, at: usize) {
        if at >= self.len() {
            return;
        }
        let byte = byte_index(&self.chars, at);
        self.chars.remove(byte);
    }

    pub fn append_str(&mut self, s: &str) {
        self.chars.push_str(s);
    }

    /// 截斷本行並返回 `at` 之後的文本（換行分割用）
    pub fn split_off(&mut self, at: usize) -> String {
        let byte = byte_index(&self.chars, at.min(self.len()));
        self.chars.split_off(byte)
    }

    /// 重新派生渲染與高亮。前一行的註解狀態由 `prev_open` 帶入，
    /// 返回本行結束時的註解狀態供下一行使用。
    pub fn update(&mut self, syntax: Option<&'static Syntax>, prev_open: bool) -> bool {
        self.update_render();
        self.update_highlight(syntax, prev_open)
    }

    // Tab 展開到下一個 8 欄停駐點，其餘字符原樣複製
    fn update_render(&mut self) {
        let tabs = self.chars.chars().filter(|&c| c == '\t').count();
        self.render = String::with_capacity(self.chars.len() + tabs * (TAB_STOP - 1));

        let mut col = 0;
        for c in self.chars.chars() {
            if c == '\t' {
                self.render.push(' ');
                col += 1;
                while col % TAB_STOP != 0 {
                    self.render.push(' ');
                    col += 1;
                }
            } else {
                self.render.push(c);
                col += 1;
            }
        }
    }

    fn update_highlight(&mut self, syntax: Option<&'static Syntax>, prev_open: bool) -> bool {
        let render: Vec<char> = self.render.chars().collect();
        self.highlight = vec![Highlight::Normal; render.len()];

        let Some(syntax) = syntax else {
            self.open_comment = false;
            return false;
        };

        let mut prev_sep = true;
        let mut in_string: Option<char> = None;
        let mut in_comment = prev_open;

        let mut i = 0;
        while i < render.len() {
            let c = render[i];
            let prev_highlight = if i > 0 { self.highlight[i - 1] } else { Highlight::Normal };

            // 單行註解：整行剩餘部分直接標記
            if let Some(start) = syntax.singleline_comment_start {
                if in_string.is_none() && !in_comment && matches_at(&render, i, start) {
                    for slot in &mut self.highlight[i..] {
                        *slot = Highlight::Comment;
                    }
                    break;
                }
            }

            // 多行註解
            if let (Some(mcs), Some(mce)) = (syntax.multiline_comment_start, syntax.multiline_comment_end) {
                if in_string.is_none() {
                    if in_comment {
                        if matches_at(&render, i, mce) {
                            let n = mce.chars().count();
                            for slot in &mut self.highlight[i..i + n] {
                                *slot = Highlight::MlComment;
                            }
                            i += n;
                            in_comment = false;
                            prev_sep = true;
                        } else {
                            self.highlight[i] = Highlight::MlComment;
                            i += 1;
                        }
                        continue;
                    } else if matches_at(&render, i, mcs) {
                        let n = mcs.chars().count();
                        for slot in &mut self.highlight[i..i + n] {
                            *slot = Highlight::MlComment;
                        }
                        i += n;
                        in_comment = true;
                        continue;
                    }
                }
            }

            // 字符串，反斜線跳脫連同被跳脫的字符一起標記
            if syntax.highlight_strings {
                if let Some(quote) = in_string {
                    self.highlight[i] = Highlight::String;
                    if c == '\\' && i + 1 < render.len() {
                        self.highlight[i + 1] = Highlight::String;
                        i += 2;
                        continue;
                    }
                    if c == quote {
                        in_string = None;
                    }
                    i += 1;
                    prev_sep = true;
                    continue;
                } else if c == '"' || c == '\'' {
                    in_string = Some(c);
                    self.highlight[i] = Highlight::String;
                    i += 1;
                    continue;
                }
            }

            // 數字：前面必須是分隔符或延續中的數字
            if syntax.highlight_numbers
                && ((c.is_ascii_digit() && (prev_sep || prev_highlight == Highlight::Number))
                    || (c == '.' && prev_highlight == Highlight::Number))
            {
                self.highlight[i] = Highlight::Number;
                i += 1;
                prev_sep = false;
                continue;
            }

            // 關鍵字：完整長度匹配，後面必須是分隔符或行尾
            if prev_sep {
                let matched = syntax.keywords.iter().find(|keyword| {
                    let klen = keyword.text.chars().count();
                    i + klen <= render.len()
                        && render[i..i + klen].iter().copied().eq(keyword.text.chars())
                        && (i + klen == render.len() || syntax::is_separator(render[i + klen]))
                });
                if let Some(keyword) = matched {
                    let klen = keyword.text.chars().count();
                    let tag = match keyword.kind {
                        KeywordKind::Primary => Highlight::Keyword1,
                        KeywordKind::Secondary => Highlight::Keyword2,
                    };
                    for slot in &mut self.highlight[i..i + klen] {
                        *slot = tag;
                    }
                    i += klen;
                    prev_sep = false;
                    continue;
                }
            }

            prev_sep = syntax::is_separator(c);
            i += 1;
        }

        self.open_comment = in_comment;
        self.open_comment
    }

    /// 字符列轉渲染列（Tab 佔用至多 TAB_STOP-1 個額外欄位）
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for c in self.chars.chars().take(cx) {
            if c == '\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP);
            }
            rx += 1;
        }
        rx
    }

    /// 渲染列轉字符列，cx_to_rx 的逆運算
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, c) in self.chars.chars().enumerate() {
            if c == '\t' {
                cur_rx += (TAB_STOP - 1) - (cur_rx % TAB_STOP);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.len()
    }

    /// 暫時把一段渲染區間標記為搜索匹配，返回原本的高亮供還原
    pub fn highlight_match(&mut self, at: usize, len: usize) -> Vec<Highlight> {
        let saved = self.highlight.clone();
        let end = (at + len).min(self.highlight.len());
        for slot in &mut self.highlight[at.min(end)..end] {
            *slot = Highlight::Match;
        }
        saved
    }

    pub fn restore_highlight(&mut self, saved: Vec<Highlight>) {
        self.highlight = saved;
    }
}

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

fn matches_at(render: &[char], at: usize, token: &str) -> bool {
    let n = token.chars().count();
    at + n <= render.len() && render[at..at + n].iter().copied().eq(token.chars())
}
