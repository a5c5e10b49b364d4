// 編輯器控制器：按鍵分派、提示輸入、增量搜索與退出確認

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};

use crate::cursor::Cursor;
use crate::document::Document;
use crate::input::{handle_key_event, Command, Direction};
use crate::search::Search;
use crate::syntax::Highlight;
use crate::terminal::{InputEvent, Terminal};
use crate::view::View;

/// 有未存檔修改時需要連按 Ctrl-Q 的次數
const QUIT_TIMES: u8 = 3;
/// 狀態訊息的顯示時限
const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

struct StatusMessage {
    text: String,
    time: Instant,
}

pub struct Editor {
    document: Document,
    cursor: Cursor,
    view: View,
    search: Search,
    message: Option<StatusMessage>,
    quit_times: u8, // 剩餘需要的連續 Ctrl-Q 次數
    should_quit: bool,
}

impl Editor {
    pub fn new(path: Option<&Path>, size: (u16, u16)) -> Result<Self> {
        let document = match path {
            Some(path) => Document::open(path)?,
            None => Document::new(),
        };

        let mut editor = Self {
            document,
            cursor: Cursor::new(),
            view: View::new(size),
            search: Search::new(),
            message: None,
            quit_times: QUIT_TIMES,
            should_quit: false,
        };
        editor.set_status_message("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find");
        Ok(editor)
    }

    pub fn run(&mut self) -> Result<()> {
        Terminal::enter_raw_mode()?;
        Terminal::clear_screen()?;

        while !self.should_quit {
            self.refresh_screen()?;

            match Terminal::read_event()? {
                InputEvent::Key(key_event) => {
                    if let Some(command) = handle_key_event(key_event) {
                        self.handle_command(command)?;
                    }
                }
                InputEvent::Resize(cols, rows) => self.view.resize(cols, rows),
            }
        }

        Terminal::clear_screen()?;
        Terminal::exit_raw_mode()?;
        Ok(())
    }

    fn refresh_screen(&mut self) -> Result<()> {
        self.view.scroll(&self.cursor, &self.document);
        let message = self
            .message
            .as_ref()
            .filter(|m| m.time.elapsed() < MESSAGE_TIMEOUT)
            .map(|m| m.text.as_str());
        self.view.render(&self.document, &self.cursor, message)
    }

    fn set_status_message(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            time: Instant::now(),
        });
    }

    fn handle_command(&mut self, command: Command) -> Result<()> {
        // 任何非 Quit 命令都重置退出計數
        if !matches!(command, Command::Quit) {
            self.quit_times = QUIT_TIMES;
        }

        match command {
            Command::Insert(c) => {
                self.document.insert_char(self.cursor.x, self.cursor.y, c);
                self.cursor.x += 1;
            }
            Command::InsertNewline => {
                self.document.insert_newline(self.cursor.x, self.cursor.y);
                self.cursor.y += 1;
                self.cursor.x = 0;
            }
            Command::Backspace => {
                let (x, y) = self.document.delete_char(self.cursor.x, self.cursor.y);
                self.cursor = Cursor { x, y };
            }
            Command::Delete => {
                // 先右移一格再往回刪
                self.cursor.move_right(&self.document);
                let (x, y) = self.document.delete_char(self.cursor.x, self.cursor.y);
                self.cursor = Cursor { x, y };
            }
            Command::Move(direction) => match direction {
                Direction::Up => self.cursor.move_up(&self.document),
                Direction::Down => self.cursor.move_down(&self.document),
                Direction::Left => self.cursor.move_left(&self.document),
                Direction::Right => self.cursor.move_right(&self.document),
            },
            Command::MoveHome => self.cursor.move_to_line_start(),
            Command::MoveEnd => self.cursor.move_to_line_end(&self.document),
            Command::PageUp => self.page_move(true),
            Command::PageDown => self.page_move(false),
            Command::Save => self.save()?,
            Command::Find => self.find()?,
            Command::Quit => {
                if self.document.is_dirty() && self.quit_times > 1 {
                    self.quit_times -= 1;
                    self.set_status_message(format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                } else {
                    self.should_quit = true;
                }
            }
            Command::ClearMessage => {
                self.message = None;
            }
        }
        Ok(())
    }

    // 先跳到視窗邊緣，再移動一整個視窗高度
    fn page_move(&mut self, up: bool) {
        if up {
            self.cursor.y = self.view.row_offset;
        } else {
            self.cursor.y = (self.view.row_offset + self.view.screen_rows)
                .saturating_sub(1)
                .min(self.document.line_count());
        }
        for _ in 0..self.view.screen_rows {
            if up {
                self.cursor.move_up(&self.document);
            } else {
                self.cursor.move_down(&self.document);
            }
        }
    }

    fn save(&mut self) -> Result<()> {
        if self.document.filename().is_none() {
            match self.prompt("Save as (ESC to cancel): ")? {
                Some(name) if !name.is_empty() => {
                    self.document.set_filename(Path::new(&name));
                }
                _ => {
                    self.set_status_message("Save aborted");
                    return Ok(());
                }
            }
        }

        match self.document.save() {
            Ok(bytes) => self.set_status_message(format!("{} bytes written to disk", bytes)),
            Err(err) => {
                log::error!("save failed: {err:#}");
                self.set_status_message(format!("Can't save! I/O error: {err}"));
            }
        }
        Ok(())
    }

    /// 在訊息欄上收集一行輸入，即時回顯。ESC 取消，Enter 送出非空輸入。
    fn prompt(&mut self, prefix: &str) -> Result<Option<String>> {
        let mut input = String::new();
        loop {
            self.set_status_message(format!("{}{}", prefix, input));
            self.refresh_screen()?;

            let key_event = match Terminal::read_event()? {
                InputEvent::Key(key_event) => key_event,
                InputEvent::Resize(cols, rows) => {
                    self.view.resize(cols, rows);
                    continue;
                }
            };

            match key_event.code {
                KeyCode::Enter => {
                    if !input.is_empty() {
                        self.message = None;
                        return Ok(Some(input));
                    }
                }
                KeyCode::Esc => {
                    self.message = None;
                    return Ok(None);
                }
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                    input.push(c);
                }
                _ => {}
            }
        }
    }

    /// 增量搜索：每個按鍵都推進一步。ESC 還原進入時的位置，Enter 留在匹配處。
    fn find(&mut self) -> Result<()> {
        let saved_cursor = self.cursor;
        let saved_row_offset = self.view.row_offset;
        let saved_col_offset = self.view.col_offset;

        let mut query = String::new();
        // 當前匹配行被暫時蓋上 Match 標記，下一步之前要還原
        let mut saved_highlight: Option<(usize, Vec<Highlight>)> = None;

        loop {
            self.set_status_message(format!("Search (ESC/Arrows/Enter): {}", query));
            self.refresh_screen()?;

            let key_event = match Terminal::read_event()? {
                InputEvent::Key(key_event) => key_event,
                InputEvent::Resize(cols, rows) => {
                    self.view.resize(cols, rows);
                    continue;
                }
            };

            if let Some((y, highlight)) = saved_highlight.take() {
                if let Some(row) = self.document.row_mut(y) {
                    row.restore_highlight(highlight);
                }
            }

            match key_event.code {
                KeyCode::Enter | KeyCode::Esc => {
                    if key_event.code == KeyCode::Esc {
                        self.cursor = saved_cursor;
                        self.view.row_offset = saved_row_offset;
                        self.view.col_offset = saved_col_offset;
                    }
                    self.search.reset();
                    self.message = None;
                    return Ok(());
                }
                KeyCode::Right | KeyCode::Down => self.search.set_direction(true),
                KeyCode::Left | KeyCode::Up => self.search.set_direction(false),
                KeyCode::Backspace => {
                    query.pop();
                    self.search.reset();
                }
                KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                    query.push(c);
                    self.search.reset();
                }
                _ => {
                    // 其他按鍵清除錨點，下一步從頭開始向前搜索
                    self.search.reset();
                }
            }

            if let Some(hit) = self.search.step(&self.document, &query) {
                self.cursor.y = hit.y;
                if let Some(row) = self.document.row_mut(hit.y) {
                    self.cursor.x = row.rx_to_cx(hit.rx);
                    saved_highlight = Some((hit.y, row.highlight_match(hit.rx, query.chars().count())));
                }
                // 把偏移推到底，scroll 會把匹配行拉回視窗頂端
                self.view.row_offset = self.document.line_count();
            }
        }
    }
}
