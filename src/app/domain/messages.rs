/// All messages that can be sent through the FLTK channel.
/// Toolbar buttons, menu items and widget callbacks send one of these;
/// the dispatch loop in main handles them.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // File
    FileNew,
    FileOpen,
    FileSave,
    FileSaveAs,
    FileQuit,
    WindowClose,

    // Edit
    EditCut,
    EditCopy,
    EditPaste,
    ShowFind,
    SearchChanged,
    SearchNext,

    // Editor events
    BufferModified,
    CursorMoved,

    // View
    ToggleTerminal,
    ToggleDarkMode,
    ZoomIn,
    ZoomOut,

    // Terminal
    TerminalOutput(Vec<u8>),
    TerminalExited,
    TerminalInput(Vec<u8>),
    TerminalResized,

    ShowAbout,
}
