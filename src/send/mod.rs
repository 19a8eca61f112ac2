mod session;

pub use session::SendSession;
