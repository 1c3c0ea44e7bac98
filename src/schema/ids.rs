//! Deterministic `@id` assignment.
//!
//! Every id is the site url (or page url) plus a fixed fragment, so an id never
//! depends on which other nodes happen to exist in the graph.

/// Fixed fragments for site-wide nodes.
pub const ORG: &str = "#org";
pub const LOGO: &str = "#logo";
pub const WEBSITE: &str = "#website";
pub const LB_MAIN: &str = "#lb-main";
pub const LB_IMAGE: &str = "#lb-image";

/// Fixed fragments for page nodes.
pub const WEBPAGE: &str = "#webpage";
pub const FAQ: &str = "#faq";
pub const BREADCRUMB: &str = "#breadcrumb";
pub const ITEMLIST: &str = "#itemlist";
pub const ARTICLE: &str = "#article";
pub const QA: &str = "#qa";
pub const PRODUCT: &str = "#product";
pub const PRIMARY_IMAGE: &str = "#primaryimage";

/// Site-wide ids derived from the normalized site url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdMap {
    pub site_url: String,
    pub org: String,
    pub logo: String,
    pub website: String,
    pub lb_main: String,
    pub lb_image: String,
}

impl IdMap {
    pub fn new(site_url: &str) -> Self {
        let id = |suffix: &str| format!("{site_url}{suffix}");
        Self {
            site_url: site_url.to_owned(),
            org: id(ORG),
            logo: id(LOGO),
            website: id(WEBSITE),
            lb_main: id(LB_MAIN),
            lb_image: id(LB_IMAGE),
        }
    }
}

/// Ids of nodes describing one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIds {
    pub url: String,
    pub webpage: String,
    pub faq: String,
    pub breadcrumb: String,
    pub itemlist: String,
    pub article: String,
    pub qa: String,
    pub product: String,
    pub primary_image: String,
}

impl PageIds {
    /// Ids for `url`; any fragment already on the url is dropped.
    pub fn new(url: &str) -> Self {
        let url = url.split_once('#').map_or(url, |(base, _)| base);
        let id = |suffix: &str| format!("{url}{suffix}");
        Self {
            url: url.to_owned(),
            webpage: id(WEBPAGE),
            faq: id(FAQ),
            breadcrumb: id(BREADCRUMB),
            itemlist: id(ITEMLIST),
            article: id(ARTICLE),
            qa: id(QA),
            product: id(PRODUCT),
            primary_image: id(PRIMARY_IMAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_ids() {
        let ids = IdMap::new("http://x.test/");
        assert_eq!(ids.org, "http://x.test/#org");
        assert_eq!(ids.logo, "http://x.test/#logo");
        assert_eq!(ids.website, "http://x.test/#website");
        assert_eq!(ids.lb_main, "http://x.test/#lb-main");
        assert_eq!(ids.lb_image, "http://x.test/#lb-image");
    }

    #[test]
    fn test_page_ids_drop_fragment() {
        let ids = PageIds::new("http://x.test/a/#top");
        assert_eq!(ids.url, "http://x.test/a/");
        assert_eq!(ids.webpage, "http://x.test/a/#webpage");
        assert_eq!(ids.breadcrumb, "http://x.test/a/#breadcrumb");
    }
}
