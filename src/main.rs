use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use tedi::editor::Editor;
use tedi::terminal::Terminal;

#[derive(Parser, Debug)]
#[command(name = "tedi")]
#[command(author = "wen")]
#[command(version)]
#[command(about = "A minimalist terminal text editor with syntax highlighting.")]
#[command(long_about = "
tedi - a minimalist terminal text editor

KEYBOARD SHORTCUTS:

  Ctrl+S              Save file (prompts for a name if unset)
  Ctrl+Q              Quit (press three times if modified)
  Ctrl+F              Incremental search (arrows navigate matches,
                      Enter keeps the position, ESC cancels)
  Arrow Keys          Move cursor
  Home/End            Move to line start/end
  Page Up/Down        Scroll one screen
  Backspace/Delete    Delete before/under cursor
  Tab                 Insert a tab (rendered at 8-column stops)

SYNTAX HIGHLIGHTING:
  c/c++  - .c .h .cpp .hpp .cc .cxx
  python - .py .pyw
  rust   - .rs
")]
struct Args {
    /// File to open or create (optional, Ctrl+S will prompt for a name)
    file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

// 初始化日誌
fn init_logger(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Error
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.debug);

    let terminal = Terminal::new()?;
    let mut editor = Editor::new(args.file.as_deref(), terminal.size())?;

    // 設置 panic hook 以確保終端正常恢復
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = Terminal::exit_raw_mode();
        let _ = Terminal::show_cursor();
        original_hook(panic_info);
    }));

    editor.run()?;

    Ok(())
}
