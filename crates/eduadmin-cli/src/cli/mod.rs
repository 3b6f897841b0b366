pub mod banners;
pub mod session;
pub mod terminal;

pub use banners::{render_banner, BannerPrinter, BannerTask};
pub use session::{load_table, Session, Status};
pub use terminal::TerminalPage;
