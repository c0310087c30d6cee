//! Locator builders for CDN-hosted assets.
//!
//! Pure functions: each takes the CDN base (with trailing slash), typed
//! identifiers and the image size, and returns an absolute locator.

use crate::model::User;

/// Avatar locator for `user`.
///
/// Animated hashes (`a_` prefix) point at the GIF rendition. Users without
/// an avatar hash get the default avatar picked by discriminator.
///
/// ```
/// use chatvault::fetch::endpoints::avatar_url;
/// use chatvault::model::User;
///
/// let user = User { id: "7".into(), avatar: "abc".into(), ..User::default() };
/// assert_eq!(
///     avatar_url("https://cdn.discordapp.com/", &user, 2048),
///     "https://cdn.discordapp.com/avatars/7/abc.png?size=2048"
/// );
/// ```
pub fn avatar_url(base: &str, user: &User, size: u32) -> String {
    if user.avatar.is_empty() {
        let index = user.discriminator.parse::<u16>().unwrap_or(0) % 5;
        return format!("{base}embed/avatars/{index}.png?size={size}");
    }
    let ext = if user.avatar.starts_with("a_") { "gif" } else { "png" };
    format!("{base}avatars/{}/{}.{ext}?size={size}", user.id, user.avatar)
}

/// Custom emoji locator.
pub fn emoji_url(base: &str, emoji_id: &str, animated: bool, size: u32) -> String {
    let ext = if animated { "gif" } else { "png" };
    format!("{base}emojis/{emoji_id}.{ext}?size={size}")
}

/// Guild icon locator.
pub fn icon_url(base: &str, guild_id: &str, hash: &str, size: u32) -> String {
    format!("{base}icons/{guild_id}/{hash}.png?size={size}")
}

/// Guild splash locator.
pub fn splash_url(base: &str, guild_id: &str, hash: &str, size: u32) -> String {
    format!("{base}splashes/{guild_id}/{hash}.png?size={size}")
}
