//! Fixed sizes that aren't worth plumbing through `Config`.

/// `recv`/`send` stack buffer size per syscall.
pub const IO_BUF_LEN: usize = 4096;
