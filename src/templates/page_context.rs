use crate::models::{CurrentUser, Flash};

/// Fields every page shares with `base.html`: the signed-in user for the
/// navigation, the pending flashes and the footer hostname.
pub trait PageContext {
    fn viewer(&self) -> Option<&CurrentUser>;
    fn flashes(&self) -> &[Flash];
    fn api_hostname(&self) -> &str;
}

/// Implements [`PageContext`] for a page struct carrying the standard
/// `current_user`, `flash_messages` and `api_hostname` fields.
#[macro_export]
macro_rules! impl_page_context {
    ($page:ty) => {
        impl $crate::templates::PageContext for $page {
            fn viewer(&self) -> Option<&$crate::models::CurrentUser> {
                self.current_user.as_ref()
            }
            fn flashes(&self) -> &[$crate::models::Flash] {
                &self.flash_messages
            }
            fn api_hostname(&self) -> &str {
                &self.api_hostname
            }
        }
    };
}
