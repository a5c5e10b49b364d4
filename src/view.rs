// 視圖：捲動對齊與畫面繪製

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor, execute, queue,
    style::{self, Attribute, Color},
    terminal::{Clear, ClearType},
};

use crate::cursor::Cursor;
use crate::document::Document;
use crate::row::Row;
use crate::syntax::{self, Highlight};

pub struct View {
    pub row_offset: usize,
    pub col_offset: usize,
    /// 渲染空間中的光標列，由 `scroll` 派生
    pub rx: usize,
    pub screen_rows: usize,
    pub screen_cols: usize,
}

impl View {
    pub fn new(size: (u16, u16)) -> Self {
        let (cols, rows) = size;
        Self {
            row_offset: 0,
            col_offset: 0,
            rx: 0,
            // 保留狀態欄與訊息欄兩行
            screen_rows: (rows as usize).saturating_sub(2),
            screen_cols: cols as usize,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.screen_rows = (rows as usize).saturating_sub(2);
        self.screen_cols = cols as usize;
    }

    /// 重新派生 rx 並調整兩個方向的捲動偏移，讓光標留在視窗內
    pub fn scroll(&mut self, cursor: &Cursor, document: &Document) {
        self.rx = document.row(cursor.y).map_or(0, |row| row.cx_to_rx(cursor.x));

        if cursor.y < self.row_offset {
            self.row_offset = cursor.y;
        }
        if cursor.y >= self.row_offset + self.screen_rows {
            self.row_offset = cursor.y + 1 - self.screen_rows;
        }
        if self.rx < self.col_offset {
            self.col_offset = self.rx;
        }
        if self.rx >= self.col_offset + self.screen_cols {
            self.col_offset = self.rx + 1 - self.screen_cols;
        }
    }

    /// 繪製一幀：文本區、狀態欄、訊息欄，最後擺放光標
    pub fn render(&self, document: &Document, cursor: &Cursor, message: Option<&str>) -> Result<()> {
        let mut stdout = io::stdout();

        execute!(stdout, cursor::Hide, cursor::MoveTo(0, 0))?;

        self.draw_rows(&mut stdout, document)?;
        self.draw_status_bar(&mut stdout, document, cursor)?;
        self.draw_message_bar(&mut stdout, message)?;

        let cursor_x = (self.rx - self.col_offset) as u16;
        let cursor_y = (cursor.y - self.row_offset) as u16;
        queue!(stdout, cursor::MoveTo(cursor_x, cursor_y), cursor::Show)?;

        stdout.flush()?;
        Ok(())
    }

    fn draw_rows(&self, stdout: &mut impl Write, document: &Document) -> Result<()> {
        for screen_row in 0..self.screen_rows {
            let file_row = self.row_offset + screen_row;
            queue!(stdout, cursor::MoveTo(0, screen_row as u16))?;

            if let Some(row) = document.row(file_row) {
                self.draw_row(stdout, row)?;
            } else if document.line_count() == 0 && screen_row == self.screen_rows / 3 {
                self.draw_welcome(stdout)?;
            } else {
                queue!(stdout, style::Print("~"))?;
            }

            queue!(stdout, Clear(ClearType::UntilNewLine))?;
        }
        Ok(())
    }

    // 依高亮分類切換前景色，連續同色的字符只發一次色彩指令
    fn draw_row(&self, stdout: &mut impl Write, row: &Row) -> Result<()> {
        let render: Vec<char> = row.render().chars().collect();
        let highlight = row.highlight();
        let start = self.col_offset.min(render.len());
        let end = (self.col_offset + self.screen_cols).min(render.len());

        let mut current_color: Option<Color> = None;
        for idx in start..end {
            let c = render[idx];

            if c.is_control() {
                // 控制字符反白顯示為替代符號
                let symbol = if (c as u32) <= 26 {
                    (b'@' + c as u8) as char
                } else {
                    '?'
                };
                queue!(
                    stdout,
                    style::SetAttribute(Attribute::Reverse),
                    style::Print(symbol),
                    style::SetAttribute(Attribute::NoReverse)
                )?;
                // 反白重置會洗掉前景色
                if let Some(color) = current_color {
                    queue!(stdout, style::SetForegroundColor(color))?;
                }
                continue;
            }

            let color = match highlight.get(idx) {
                Some(&h) if h != Highlight::Normal => Some(syntax::color_for(h)),
                _ => None,
            };
            if color != current_color {
                queue!(
                    stdout,
                    style::SetForegroundColor(color.unwrap_or(Color::Reset))
                )?;
                current_color = color;
            }
            queue!(stdout, style::Print(c))?;
        }
        queue!(stdout, style::ResetColor)?;
        Ok(())
    }

    fn draw_welcome(&self, stdout: &mut impl Write) -> Result<()> {
        let mut welcome = format!("tedi -- version {}", env!("CARGO_PKG_VERSION"));
        welcome.truncate(self.screen_cols);

        let padding = self.screen_cols.saturating_sub(welcome.len()) / 2;
        if padding > 0 {
            queue!(stdout, style::Print("~"))?;
            queue!(stdout, style::Print(" ".repeat(padding - 1)))?;
        }
        queue!(stdout, style::Print(welcome))?;
        Ok(())
    }

    fn draw_status_bar(
        &self,
        stdout: &mut impl Write,
        document: &Document,
        cursor: &Cursor,
    ) -> Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, self.screen_rows as u16),
            style::SetBackgroundColor(Color::DarkGrey),
            style::SetForegroundColor(Color::White)
        )?;

        let modified = if document.is_dirty() { " (modified)" } else { "" };
        let mut status = format!(
            " {} - {} lines{}",
            document.file_name(),
            document.line_count(),
            modified
        );
        let filetype = document.syntax().map_or("no ft", |s| s.filetype);
        let rstatus = format!("{} | {}/{} ", filetype, cursor.y + 1, document.line_count());

        // 左側狀態靠左，文件類型與行號靠右，中間補滿空格
        status.truncate(self.screen_cols);
        if status.len() + rstatus.len() <= self.screen_cols {
            let gap = self.screen_cols - status.len() - rstatus.len();
            status.push_str(&" ".repeat(gap));
            status.push_str(&rstatus);
        } else {
            let gap = self.screen_cols - status.len();
            status.push_str(&" ".repeat(gap));
        }

        queue!(stdout, style::Print(status), style::ResetColor)?;
        Ok(())
    }

    fn draw_message_bar(&self, stdout: &mut impl Write, message: Option<&str>) -> Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, (self.screen_rows + 1) as u16),
            Clear(ClearType::UntilNewLine)
        )?;
        if let Some(message) = message {
            let mut message = message.to_string();
            message.truncate(self.screen_cols);
            queue!(stdout, style::Print(message))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_from(lines: &[&str]) -> Document {
        let mut document = Document::new();
        document.load(lines.iter().copied());
        document
    }

    fn many_lines(n: usize) -> Document {
        let lines: Vec<String> = (0..n).map(|i| format!("line {}", i)).collect();
        let mut document = Document::new();
        document.load(lines.iter().map(String::as_str));
        document
    }

    #[test]
    fn cursor_below_viewport_scrolls_to_last_visible_row() {
        let document = many_lines(40);
        // 12 列高的終端，扣掉兩條欄位後視窗有 10 行
        let mut view = View::new((80, 12));
        assert_eq!(view.screen_rows, 10);

        let cursor = Cursor { x: 0, y: 15 };
        view.scroll(&cursor, &document);
        assert_eq!(view.row_offset, 15 - 10 + 1);
    }

    #[test]
    fn cursor_above_viewport_scrolls_up() {
        let document = many_lines(40);
        let mut view = View::new((80, 12));
        view.row_offset = 20;

        let cursor = Cursor { x: 0, y: 5 };
        view.scroll(&cursor, &document);
        assert_eq!(view.row_offset, 5);
    }

    #[test]
    fn horizontal_scroll_follows_render_column() {
        let long = "x".repeat(200);
        let mut document = Document::new();
        document.load([long.as_str()]);
        let mut view = View::new((80, 24));

        let cursor = Cursor { x: 150, y: 0 };
        view.scroll(&cursor, &document);
        assert_eq!(view.rx, 150);
        assert_eq!(view.col_offset, 150 - 80 + 1);

        let cursor = Cursor { x: 0, y: 0 };
        view.scroll(&cursor, &document);
        assert_eq!(view.col_offset, 0);
    }

    #[test]
    fn rx_derives_from_tab_expansion() {
        let document = doc_from(&["\tabc"]);
        let mut view = View::new((80, 24));

        let cursor = Cursor { x: 1, y: 0 };
        view.scroll(&cursor, &document);
        assert_eq!(view.rx, 8);
    }

    #[test]
    fn rx_is_zero_past_last_line() {
        let document = doc_from(&["abc"]);
        let mut view = View::new((80, 24));

        // 哨兵行上沒有文本，rx 歸零
        let cursor = Cursor { x: 0, y: 1 };
        view.scroll(&cursor, &document);
        assert_eq!(view.rx, 0);
    }

    #[test]
    fn resize_reserves_two_bar_rows() {
        let mut view = View::new((80, 24));
        view.resize(100, 30);
        assert_eq!(view.screen_rows, 28);
        assert_eq!(view.screen_cols, 100);
    }
}
