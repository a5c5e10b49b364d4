/// 移動方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// 編輯器命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // 字符輸入
    Insert(char),
    InsertNewline,

    // 刪除操作
    Backspace,
    Delete,

    // 光標移動
    Move(Direction),
    MoveHome,
    MoveEnd,
    PageUp,
    PageDown,

    // 文件操作
    Save,
    Quit,

    // 搜索
    Find,

    // 清除訊息
    ClearMessage,
}
