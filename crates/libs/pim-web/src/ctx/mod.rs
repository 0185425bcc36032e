//! Request context for authenticated web requests.

pub mod resolver;

/// The user behind a validated session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ctx {
    pub user_id: i32,
}

impl Ctx {
    /// # Examples
    ///
    /// ```rust
    /// use pim_web::ctx::Ctx;
    ///
    /// let ctx = Ctx::new(7);
    /// assert_eq!(ctx.user_id, 7);
    /// ```
    pub fn new(user_id: i32) -> Self {
        Self { user_id }
    }
}
