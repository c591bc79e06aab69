use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::listing::Listing;
use crate::error::{MarketplaceError, Result};

/// Extract listing cards from a search results page.
///
/// A card is any element carrying `data-listing-id`. Cards without a usable
/// title are skipped. A page with no cards yields an empty list.
pub fn parse_search_results(html: &str, base_url: &str) -> Result<Vec<Listing>> {
    let document = Html::parse_document(html);
    let card_selector = selector("[data-listing-id]")?;
    let fields = FieldSelectors::new()?;

    let mut listings = Vec::new();
    for card in document.select(&card_selector) {
        let Some(id) = card
            .value()
            .attr("data-listing-id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
        else {
            continue;
        };
        let Some(title) = first_text(card, &fields.title) else {
            tracing::debug!(id, "Skipping listing card without a title");
            continue;
        };

        let url = card
            .select(&fields.link)
            .find_map(|a| a.value().attr("href"))
            .and_then(|href| resolve(base_url, href))
            .unwrap_or_else(|| listing_url(base_url, id));

        listings.push(Listing {
            id: id.to_string(),
            title,
            price: first_text(card, &fields.price),
            location: first_text(card, &fields.location),
            category: first_text(card, &fields.category),
            description: first_text(card, &fields.description),
            images: images(card, &fields.image, base_url),
            date_posted: date_posted(card, &fields.date),
            contact_info: None,
            url,
        });
    }

    Ok(listings)
}

/// Parse a single listing page. The page must contain an `<h1>` title.
pub fn parse_listing_detail(html: &str, id: &str, base_url: &str) -> Result<Listing> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let fields = FieldSelectors::new()?;
    let heading = selector("h1")?;

    let title = first_text(root, &heading).ok_or_else(|| MarketplaceError::Parse {
        reason: format!("listing page for '{id}' has no title"),
    })?;

    Ok(Listing {
        id: id.to_string(),
        title,
        price: first_text(root, &fields.price),
        location: first_text(root, &fields.location),
        category: first_text(root, &fields.category),
        description: first_text(root, &fields.description),
        images: images(root, &fields.image, base_url),
        date_posted: date_posted(root, &fields.date),
        contact_info: first_text(root, &fields.contact),
        url: listing_url(base_url, id),
    })
}

/// Visible option labels of `<select name="{name}">`, skipping placeholder
/// options with an empty value.
pub fn parse_select_options(html: &str, name: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let options = selector(&format!("select[name='{name}'] option"))?;

    let mut values = Vec::new();
    for option in document.select(&options) {
        if option.value().attr("value").is_some_and(|v| v.trim().is_empty()) {
            continue;
        }
        let label = collapse(option.text());
        if !label.is_empty() && !values.contains(&label) {
            values.push(label);
        }
    }
    Ok(values)
}

pub fn listing_url(base_url: &str, id: &str) -> String {
    format!("{}/listing/{id}", base_url.trim_end_matches('/'))
}

struct FieldSelectors {
    title: Selector,
    link: Selector,
    price: Selector,
    location: Selector,
    category: Selector,
    description: Selector,
    image: Selector,
    date: Selector,
    contact: Selector,
}

impl FieldSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            title: selector(".listing-title, .title, h2, h3")?,
            link: selector("a[href]")?,
            price: selector(".price")?,
            location: selector(".location")?,
            category: selector(".category")?,
            description: selector(".description")?,
            image: selector("img[src]")?,
            date: selector("time, .date")?,
            contact: selector(".contact, .contact-info")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| MarketplaceError::Parse {
        reason: format!("invalid CSS selector '{css}': {e}"),
    })
}

fn first_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope
        .select(sel)
        .map(|el| collapse(el.text()))
        .find(|text| !text.is_empty())
}

fn collapse<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn images(scope: ElementRef<'_>, sel: &Selector, base_url: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for src in scope.select(sel).filter_map(|img| img.value().attr("src")) {
        if let Some(url) = resolve(base_url, src)
            && !urls.contains(&url)
        {
            urls.push(url);
        }
    }
    urls
}

// Prefer a machine-readable `datetime` attribute over the visible text.
fn date_posted(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    let el = scope.select(sel).next()?;
    el.value()
        .attr("datetime")
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .or_else(|| Some(collapse(el.text())).filter(|t| !t.is_empty()))
}

fn resolve(base_url: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if let Ok(absolute) = Url::parse(href) {
        return Some(absolute.to_string());
    }
    Url::parse(base_url)
        .and_then(|base| base.join(href))
        .ok()
        .map(|u| u.to_string())
}
