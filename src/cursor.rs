// 光標移動

use crate::document::Document;

/// 字符座標下的光標位置。`y` 允許等於行數，
/// 代表「最後一行之後」的附加位置，插入操作依賴這個哨兵值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self { x: 0, y: 0 }
    }

    pub fn move_up(&mut self, document: &Document) {
        if self.y > 0 {
            self.y -= 1;
        }
        self.snap_to_line_end(document);
    }

    pub fn move_down(&mut self, document: &Document) {
        if self.y < document.line_count() {
            self.y += 1;
        }
        self.snap_to_line_end(document);
    }

    pub fn move_left(&mut self, document: &Document) {
        if self.x > 0 {
            self.x -= 1;
        } else if self.y > 0 {
            // 行首繼續往左：移到上一行末尾
            self.y -= 1;
            self.x = document.line_len(self.y);
        }
    }

    pub fn move_right(&mut self, document: &Document) {
        if self.y < document.line_count() {
            if self.x < document.line_len(self.y) {
                self.x += 1;
            } else {
                // 行尾繼續往右：移到下一行開頭
                self.y += 1;
                self.x = 0;
            }
        }
    }

    pub fn move_to_line_start(&mut self) {
        self.x = 0;
    }

    pub fn move_to_line_end(&mut self, document: &Document) {
        self.x = document.line_len(self.y);
    }

    // 垂直移動後把 x 夾回新行的長度，移到較短的行會貼齊行尾
    fn snap_to_line_end(&mut self, document: &Document) {
        let len = document.line_len(self.y);
        if self.x > len {
            self.x = len;
        }
    }
}
