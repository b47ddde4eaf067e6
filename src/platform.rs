//! Vendor id → display name and icon tables.

use std::collections::HashMap;

const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("36kr", "36氪"),
    ("baidu", "百度"),
    ("bilibili", "B站"),
    ("douban-group", "豆瓣小组"),
    ("douyin", "抖音"),
    ("geekpark", "极客公园"),
    ("hupu", "虎扑"),
    ("ithome", "IT之家"),
    ("kuaishou", "快手"),
    ("netease-news", "网易新闻"),
    ("qq-news", "腾讯新闻"),
    ("smzdm", "什么值得买"),
    ("sspai", "少数派"),
    ("thepaper", "澎湃新闻"),
    ("tieba", "百度贴吧"),
    ("toutiao", "今日头条"),
    ("weibo", "微博"),
    ("weread", "微信读书"),
    ("xiaohongshu", "小红书"),
    ("zhihu", "知乎"),
];

const ICONS: &[(&str, &str)] = &[
    ("36kr", "fas fa-rocket"),
    ("baidu", "fas fa-search"),
    ("bilibili", "fas fa-play-circle"),
    ("douban-group", "fas fa-users"),
    ("douyin", "fas fa-music"),
    ("geekpark", "fas fa-microchip"),
    ("hupu", "fas fa-basketball-ball"),
    ("ithome", "fas fa-laptop"),
    ("kuaishou", "fas fa-video"),
    ("netease-news", "fas fa-newspaper"),
    ("qq-news", "fas fa-comment-dots"),
    ("smzdm", "fas fa-shopping-cart"),
    ("sspai", "fas fa-mobile-alt"),
    ("thepaper", "fas fa-file-alt"),
    ("tieba", "fas fa-comments"),
    ("toutiao", "fas fa-fire"),
    ("weibo", "fas fa-comment"),
    ("weread", "fas fa-book"),
    ("xiaohongshu", "fas fa-heart"),
    ("zhihu", "fas fa-question-circle"),
];

const DEFAULT_ICON: &str = "fas fa-globe";

#[derive(Debug, Clone)]
pub struct PlatformNames {
    names: HashMap<String, String>,
}

impl Default for PlatformNames {
    fn default() -> Self {
        Self {
            names: DISPLAY_NAMES
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
        }
    }
}

impl PlatformNames {
    /// Built-in table with `overrides` layered on top
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut platforms = Self::default();
        for (id, name) in overrides {
            platforms.names.insert(id.clone(), name.clone());
        }
        platforms
    }

    /// Unknown ids are shown as-is
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.names.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn icon(&self, id: &str) -> &'static str {
        ICONS
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, icon)| *icon)
            .unwrap_or(DEFAULT_ICON)
    }
}

/// Anchor-safe form of a vendor name: CJK ideographs, ASCII letters and digits
pub fn slugify(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || ('\u{4e00}'..='\u{9fff}').contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vendor_is_translated() {
        let platforms = PlatformNames::default();
        assert_eq!(platforms.display_name("zhihu"), "知乎");
        assert_eq!(platforms.display_name("36kr"), "36氪");
    }

    #[test]
    fn test_unknown_vendor_passes_through() {
        let platforms = PlatformNames::default();
        assert_eq!(platforms.display_name("微信读书"), "微信读书");
        assert_eq!(platforms.display_name("nowhots"), "nowhots");
    }

    #[test]
    fn test_overrides_add_and_replace() {
        let mut overrides = HashMap::new();
        overrides.insert("hn".to_string(), "Hacker News".to_string());
        overrides.insert("weibo".to_string(), "新浪微博".to_string());

        let platforms = PlatformNames::with_overrides(&overrides);
        assert_eq!(platforms.display_name("hn"), "Hacker News");
        assert_eq!(platforms.display_name("weibo"), "新浪微博");
        assert_eq!(platforms.display_name("zhihu"), "知乎");
    }

    #[test]
    fn test_icons() {
        let platforms = PlatformNames::default();
        assert_eq!(platforms.icon("bilibili"), "fas fa-play-circle");
        assert_eq!(platforms.icon("somewhere"), DEFAULT_ICON);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("IT之家"), "IT之家");
        assert_eq!(slugify("douban-group"), "doubangroup");
        assert_eq!(slugify("36氪 (科技)"), "36氪科技");
        assert_eq!(slugify("!!"), "");
    }
}
