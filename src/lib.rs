//! tedi - 帶語法高亮的極簡終端文字編輯器

pub mod cursor;
pub mod document;
pub mod editor;
pub mod input;
pub mod row;
pub mod search;
pub mod syntax;
pub mod terminal;
pub mod view;

// 重新導出常用類型
pub use document::Document;
pub use editor::Editor;
pub use row::Row;
