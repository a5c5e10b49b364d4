// 增量搜索狀態機

use crate::document::Document;

/// 一次搜索命中：行號與渲染列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    pub y: usize,
    pub rx: usize,
}

/// 循環搜索的錨點狀態。查詢內容每次變更後都應 `reset`，
/// 方向鍵只切換方向而不移動錨點。
pub struct Search {
    last_match: Option<usize>,
    forward: bool,
}

impl Search {
    pub fn new() -> Self {
        Self {
            last_match: None,
            forward: true,
        }
    }

    pub fn reset(&mut self) {
        self.last_match = None;
        self.forward = true;
    }

    pub fn set_direction(&mut self, forward: bool) {
        self.forward = forward;
    }

    /// 從上一個匹配之後沿當前方向循環掃描一圈。
    /// 整圈都沒有命中時返回 None，錨點保持不變。
    pub fn step(&mut self, document: &Document, query: &str) -> Option<SearchHit> {
        if query.is_empty() || document.line_count() == 0 {
            return None;
        }
        // 沒有錨點時一律向前
        if self.last_match.is_none() {
            self.forward = true;
        }

        let count = document.line_count() as isize;
        let step: isize = if self.forward { 1 } else { -1 };
        let mut current = self.last_match.map_or(-1, |y| y as isize);

        for _ in 0..count {
            current += step;
            if current < 0 {
                current = count - 1;
            } else if current >= count {
                current = 0;
            }

            if let Some(row) = document.row(current as usize) {
                if let Some(pos) = row.render().find(query) {
                    let rx = row.render()[..pos].chars().count();
                    self.last_match = Some(current as usize);
                    return Some(SearchHit {
                        y: current as usize,
                        rx,
                    });
                }
            }
        }
        None
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}
