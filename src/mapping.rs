use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scraper::Html;
use serde_json::Value;

use crate::types::{CallToAction, Slide, SlideImage, SlideMeta, SlideType};

/// Why a raw record could not become a slide.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedRecord {
    #[error("record is not an object")]
    NotAnObject,
    #[error("record is missing mandatory field `{0}`")]
    MissingField(&'static str),
}

pub fn slide_id_from(slide_type: SlideType, raw_id: &str) -> String {
    format!("{}:{}", slide_type.as_str(), raw_id)
}

pub fn slide_from_wordpress_post(v: &Value) -> Result<Slide, MalformedRecord> {
    wordpress_slide(v, SlideType::Blog, "/blog", "Read More", SlideMeta::None)
}

pub fn slide_from_wordpress_video(v: &Value) -> Result<Slide, MalformedRecord> {
    let meta = SlideMeta::Video {
        duration: first_text(v, &["/videoDetails/duration", "/duration"]),
    };
    wordpress_slide(v, SlideType::Video, "/tutorials", "Watch Tutorial", meta)
}

fn wordpress_slide(
    v: &Value,
    slide_type: SlideType,
    section: &str,
    cta_label: &str,
    meta: SlideMeta,
) -> Result<Slide, MalformedRecord> {
    let (raw_id, title) = mandatory(v, &["/id", "/databaseId"], &["/title"])?;
    let slug = text(v, "/slug");
    let url = text(v, "/uri")
        .or_else(|| slug.as_deref().map(|s| format!("{section}/{s}")));
    let cta = explicit_cta(v).or_else(|| url.clone().map(|link| cta(cta_label, link)));
    Ok(Slide {
        id: slide_id_from(slide_type, &raw_id),
        slide_type,
        title: strip_html(&title),
        excerpt: text(v, "/excerpt").map(|s| strip_html(&s)).unwrap_or_default(),
        image: image(v, &["/featuredImage/node/sourceUrl"], &["/featuredImage/node/altText"]),
        cta,
        meta,
        published_at: first_date(v, &["/date"]),
        url: url.unwrap_or_else(|| section.to_string()),
    })
}

pub fn slide_from_contentful_beat(v: &Value) -> Result<Slide, MalformedRecord> {
    let (raw_id, title) = mandatory(v, &["/id", "/sys/id", "/contentful_id"], &["/title"])?;
    let canonical = text(v, "/slug").map(|s| format!("/beats/{s}"));
    let destination = first_text(v, &["/purchaseUrl", "/beatstarsLink"]).or_else(|| canonical.clone());
    Ok(Slide {
        id: slide_id_from(SlideType::Beat, &raw_id),
        slide_type: SlideType::Beat,
        title,
        excerpt: first_text(v, &["/description", "/subtitle"]).unwrap_or_default(),
        image: image(v, &["/coverImage/url", "/coverImage/file/url", "/artwork/url"], &["/coverImage/title"]),
        cta: explicit_cta(v).or_else(|| destination.map(|link| cta("Listen Now", link))),
        meta: SlideMeta::Beat {
            bpm: number(v, "/bpm"),
            key: text(v, "/key"),
            genre: text(v, "/genre"),
        },
        published_at: first_date(v, &["/releaseDate", "/createdAt", "/sys/createdAt"]),
        url: canonical.unwrap_or_else(|| "/beats".to_string()),
    })
}

pub fn slide_from_contentful_mix(v: &Value) -> Result<Slide, MalformedRecord> {
    let (raw_id, title) = mandatory(v, &["/id", "/sys/id", "/contentful_id"], &["/title"])?;
    let canonical = text(v, "/slug").map(|s| format!("/mixes/{s}"));
    let destination = first_text(v, &["/mixcloudUrl", "/soundcloudUrl"]).or_else(|| canonical.clone());
    Ok(Slide {
        id: slide_id_from(SlideType::Mix, &raw_id),
        slide_type: SlideType::Mix,
        title,
        excerpt: first_text(v, &["/description", "/subtitle"]).unwrap_or_default(),
        image: image(v, &["/artwork/url", "/artwork/file/url", "/coverImage/url"], &["/artwork/title"]),
        cta: explicit_cta(v).or_else(|| destination.map(|link| cta("Play Mix", link))),
        meta: SlideMeta::Mix { duration: text(v, "/duration") },
        published_at: first_date(v, &["/publishDate", "/date", "/sys/createdAt"]),
        url: canonical.unwrap_or_else(|| "/mixes".to_string()),
    })
}

pub fn slide_from_youtube_video(v: &Value) -> Result<Slide, MalformedRecord> {
    let (video_id, title) = mandatory(v, &["/videoId", "/id/videoId", "/id"], &["/title", "/snippet/title"])?;
    let url = format!("https://www.youtube.com/watch?v={video_id}");
    Ok(Slide {
        id: slide_id_from(SlideType::Youtube, &video_id),
        slide_type: SlideType::Youtube,
        title,
        excerpt: first_text(v, &["/description", "/snippet/description"]).unwrap_or_default(),
        image: image(
            v,
            &["/thumbnail/url", "/thumbnails/high/url", "/snippet/thumbnails/high/url"],
            &[],
        ),
        cta: explicit_cta(v).or_else(|| Some(cta("Watch on YouTube", url.clone()))),
        meta: SlideMeta::Video { duration: text(v, "/duration") },
        published_at: first_date(v, &["/publishedAt", "/snippet/publishedAt"]),
        url,
    })
}

pub fn slide_from_shopify_product(v: &Value) -> Result<Slide, MalformedRecord> {
    let (raw_id, title) = mandatory(v, &["/shopifyId", "/id"], &["/title"])?;
    let canonical = text(v, "/handle").map(|h| format!("/shop/{h}"));
    Ok(Slide {
        id: slide_id_from(SlideType::Product, &raw_id),
        slide_type: SlideType::Product,
        title,
        excerpt: text(v, "/description").unwrap_or_default(),
        image: image(
            v,
            &["/featuredImage/url", "/featuredImage/originalSrc", "/images/0/url"],
            &["/featuredImage/altText", "/images/0/altText"],
        ),
        cta: explicit_cta(v).or_else(|| canonical.clone().map(|link| cta("Shop Now", link))),
        meta: SlideMeta::Product {
            price: text(v, "/priceRangeV2/minVariantPrice/amount"),
            currency: text(v, "/priceRangeV2/minVariantPrice/currencyCode"),
        },
        published_at: first_date(v, &["/publishedAt", "/createdAt"]),
        url: canonical.unwrap_or_else(|| "/shop".to_string()),
    })
}

fn mandatory(v: &Value, id_paths: &[&str], title_paths: &[&str]) -> Result<(String, String), MalformedRecord> {
    if !v.is_object() {
        return Err(MalformedRecord::NotAnObject);
    }
    let id = first_text(v, id_paths).ok_or(MalformedRecord::MissingField("id"))?;
    let title = first_text(v, title_paths).ok_or(MalformedRecord::MissingField("title"))?;
    Ok((id, title))
}

// Non-empty trimmed string at `ptr`; numbers are rendered as text.
fn text(v: &Value, ptr: &str) -> Option<String> {
    match v.pointer(ptr)? {
        Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(v: &Value, ptrs: &[&str]) -> Option<String> {
    ptrs.iter().find_map(|p| text(v, p))
}

fn number(v: &Value, ptr: &str) -> Option<u32> {
    match v.pointer(ptr)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn image(v: &Value, url_paths: &[&str], alt_paths: &[&str]) -> Option<SlideImage> {
    let url = first_text(v, url_paths)?;
    // Contentful asset urls are protocol-relative
    let url = if url.starts_with("//") { format!("https:{url}") } else { url };
    Some(SlideImage { url, alt: first_text(v, alt_paths).unwrap_or_default() })
}

fn cta(label: &str, link: String) -> CallToAction {
    CallToAction { label: label.to_string(), link }
}

fn explicit_cta(v: &Value) -> Option<CallToAction> {
    let label = first_text(v, &["/cta/label", "/cta/text"])?;
    let link = first_text(v, &["/cta/url", "/cta/link"])?;
    Some(CallToAction { label, link })
}

fn first_date(v: &Value, ptrs: &[&str]) -> Option<DateTime<Utc>> {
    ptrs.iter().filter_map(|p| text(v, p)).find_map(|s| parse_date(&s))
}

/// Accepts RFC 3339, naive WordPress timestamps (UTC) and bare dates.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Text content of WordPress-rendered HTML with whitespace collapsed.
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
