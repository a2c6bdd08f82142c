//! Catalog — built-in translations for every key the formatters emit.
//!
//! Four locales: en, zh-CN, ja, es. The active locale can be switched at
//! runtime; lookups fall back to English, then to the key itself.
//!
//! ```ignore
//! let catalog = Catalog::new("es");
//! assert_eq!(catalog.t("Yesterday", None), "Ayer");
//! catalog.set_locale("ja");
//! assert_eq!(catalog.t("{{amount}} mins ago", Some(Vars::amount(5))), "5分前");
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::translate::{Translate, Vars, interpolate};

const EN: usize = 0;
const ZH: usize = 1;
const JA: usize = 2;
const ES: usize = 3;

/// Locale codes the catalog ships, in table column order.
pub const LOCALES: [&str; 4] = ["en", "zh-CN", "ja", "es"];

fn locale_index(locale: &str) -> Option<usize> {
    match locale {
        "en" | "en-US" | "en-GB" => Some(EN),
        "zh-CN" | "zh" => Some(ZH),
        "ja" => Some(JA),
        "es" => Some(ES),
        _ => None,
    }
}

/// Thread-safe translation catalog with a switchable locale.
pub struct Catalog {
    data: HashMap<&'static str, [&'static str; 4]>,
    locale: RwLock<String>,
}

impl Catalog {
    /// Create a catalog with the given active locale.
    ///
    /// Unknown locales are accepted and resolve to English text.
    pub fn new(locale: &str) -> Self {
        let mut m = HashMap::new();

        // Relative time
        m.insert("Just now", ["Just now", "刚刚", "たった今", "Justo ahora"]);
        m.insert("One min ago", ["One min ago", "1 分钟前", "1分前", "Hace un minuto"]);
        m.insert("{{amount}} mins ago", ["{{amount}} mins ago", "{{amount}} 分钟前", "{{amount}}分前", "Hace {{amount}} minutos"]);
        m.insert("One hour ago", ["One hour ago", "1 小时前", "1時間前", "Hace una hora"]);
        m.insert("{{amount}} hrs ago", ["{{amount}} hrs ago", "{{amount}} 小时前", "{{amount}}時間前", "Hace {{amount}} horas"]);
        m.insert("Yesterday", ["Yesterday", "昨天", "昨日", "Ayer"]);

        // Comment authors
        m.insert("Deleted member", ["Deleted member", "已删除的成员", "削除されたメンバー", "Miembro eliminado"]);
        m.insert("Anonymous", ["Anonymous", "匿名", "匿名", "Anónimo"]);

        // Feed
        m.insert("Loading...", ["Loading...", "加载中...", "読み込み中...", "Cargando..."]);
        m.insert("{{amount}} replies", ["{{amount}} replies", "{{amount}} 条回复", "{{amount}}件の返信", "{{amount}} respuestas"]);
        m.insert("No more posts", ["No more posts", "没有更多内容", "これ以上の投稿はありません", "No hay más publicaciones"]);

        Self {
            data: m,
            locale: RwLock::new(locale.to_string()),
        }
    }

    /// Set the active locale.
    pub fn set_locale(&self, locale: &str) {
        if locale_index(locale).is_none() {
            debug!("Catalog: locale {:?} not shipped, falling back to en", locale);
        }
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = locale.to_string();
    }

    /// The active locale.
    pub fn locale(&self) -> String {
        self.locale
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the catalog has an entry for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        let idx = locale_index(&self.locale()).unwrap_or(EN);
        match self.data.get(key) {
            Some(row) => row[idx],
            None => key,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new("en")
    }
}

impl Translate for Catalog {
    fn t(&self, key: &str, vars: Option<Vars>) -> String {
        interpolate(self.lookup(key), vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relative::format_relative_time_str;

    // ── Lookups ──

    #[test]
    fn english_default() {
        let c = Catalog::default();
        assert_eq!(c.locale(), "en");
        assert_eq!(c.t("Just now", None), "Just now");
        assert_eq!(c.t("{{amount}} mins ago", Some(Vars::amount(30))), "30 mins ago");
    }

    #[test]
    fn chinese() {
        let c = Catalog::new("zh-CN");
        assert_eq!(c.t("Yesterday", None), "昨天");
        assert_eq!(c.t("{{amount}} hrs ago", Some(Vars::amount(3))), "3 小时前");
    }

    #[test]
    fn japanese() {
        let c = Catalog::new("ja");
        assert_eq!(c.t("{{amount}} mins ago", Some(Vars::amount(5))), "5分前");
        assert_eq!(c.t("Deleted member", None), "削除されたメンバー");
    }

    #[test]
    fn spanish() {
        let c = Catalog::new("es");
        assert_eq!(c.t("One hour ago", None), "Hace una hora");
        assert_eq!(c.t("{{amount}} mins ago", Some(Vars::amount(2))), "Hace 2 minutos");
    }

    #[test]
    fn unknown_key_returns_key_interpolated() {
        let c = Catalog::new("es");
        assert_eq!(c.t("ui/nonexistent", None), "ui/nonexistent");
        assert_eq!(c.t("{{amount}} widgets", Some(Vars::amount(4))), "4 widgets");
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        let c = Catalog::new("fr");
        assert_eq!(c.t("Yesterday", None), "Yesterday");
    }

    // ── Locale switching ──

    #[test]
    fn locale_switch_all_languages() {
        let c = Catalog::default();
        let key = "Just now";

        c.set_locale("en");
        assert_eq!(c.t(key, None), "Just now");
        c.set_locale("zh-CN");
        assert_eq!(c.t(key, None), "刚刚");
        c.set_locale("ja");
        assert_eq!(c.t(key, None), "たった今");
        c.set_locale("es");
        assert_eq!(c.t(key, None), "Justo ahora");
    }

    #[test]
    fn covers_every_formatter_key() {
        let c = Catalog::default();
        for key in [
            crate::relative::keys::JUST_NOW,
            crate::relative::keys::ONE_MIN_AGO,
            crate::relative::keys::MINS_AGO,
            crate::relative::keys::ONE_HOUR_AGO,
            crate::relative::keys::HRS_AGO,
            crate::relative::keys::YESTERDAY,
            crate::member::keys::DELETED_MEMBER,
            crate::member::keys::ANONYMOUS,
        ] {
            assert!(c.contains(key), "missing {key}");
        }
    }

    #[test]
    fn drives_relative_time() {
        let c = Catalog::new("es");
        let now = crate::relative::parse_timestamp("2024-02-15T15:00:00Z").unwrap();
        assert_eq!(
            format_relative_time_str("2024-02-15T14:30:00Z", now, &c).unwrap(),
            "Hace 30 minutos"
        );
    }

    // ── Thread safety ──

    #[test]
    fn concurrent_lookups() {
        use std::sync::Arc;
        use std::thread;

        let c = Arc::new(Catalog::new("ja"));
        let mut handles = vec![];
        for _ in 0..8 {
            let c = Arc::clone(&c);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    assert_eq!(c.t("Yesterday", None), "昨日");
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
    }
}
