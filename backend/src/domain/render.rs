//! HTML rendering for page blocks.
//!
//! Rendering is pure: each block maps to a markup fragment built from its
//! configuration plus whatever the caller supplies in [`RenderContext`].
//! Unknown block kinds render a visible placeholder instead of failing. Every
//! injected value is escaped. Attribute values are always double-quoted.
//! Link targets must be relative or use an allowed scheme, and inline colours
//! must be `#rrggbb`; anything else falls back to a safe default.

use htmlescape::encode_minimal;

use crate::domain::{Block, BlockKind, Page, Tenant, ThemeColor, Vehicle, VehicleStatus};

const EMPTY_PAGE_NOTICE: &str = "This page is empty";
const DEFAULT_VEHICLE_LIMIT: usize = 12;
const DEFAULT_HERO_BACKGROUND: &str = "#1e293b";
const LINK_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

/// External data a block may draw on.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'a> {
    /// The lessor whose site is rendered, used by footer and contact blocks.
    pub lessor: Option<&'a Tenant>,
    /// Vehicles injected into `vehicle-list` blocks.
    pub vehicles: &'a [Vehicle],
}

fn text(block: &Block, key: &str) -> Option<String> {
    block
        .config
        .text(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn text_or(block: &Block, key: &str, fallback: &str) -> String {
    text(block, key).unwrap_or_else(|| fallback.to_owned())
}

/// Accept relative references and `LINK_SCHEMES` URLs only.
fn safe_link(raw: &str) -> Option<&str> {
    let link = raw.trim();
    if link.chars().any(char::is_control) {
        return None;
    }
    let scheme_end = link.find(':');
    let path_start = link.find(['/', '?', '#']);
    match (scheme_end, path_start) {
        (Some(colon), Some(delimiter)) if delimiter < colon => Some(link),
        (Some(colon), _) => LINK_SCHEMES
            .iter()
            .any(|scheme| link[..colon].eq_ignore_ascii_case(scheme))
            .then_some(link),
        (None, _) => Some(link),
    }
}

fn link(block: &Block, key: &str) -> Option<String> {
    text(block, key).and_then(|raw| safe_link(&raw).map(str::to_owned))
}

fn heading(block: &Block, tag: &str, key: &str) -> String {
    text(block, key)
        .map(|value| format!("<{tag}>{}</{tag}>", encode_minimal(&value)))
        .unwrap_or_default()
}

fn section(kind: &BlockKind, inner: &str) -> String {
    format!(
        "<section class=\"block block-{}\">{inner}</section>",
        encode_minimal(kind.as_str())
    )
}

/// Format an amount in øre as Danish kroner.
fn format_price(ore: i64) -> String {
    let kroner = ore / 100;
    let rest = (ore % 100).abs();
    if rest == 0 {
        format!("{kroner} kr.")
    } else {
        format!("{kroner},{rest:02} kr.")
    }
}

fn render_hero(block: &Block) -> String {
    let background = text(block, "bg_color")
        .and_then(|raw| ThemeColor::new(raw).ok())
        .map_or_else(|| DEFAULT_HERO_BACKGROUND.to_owned(), String::from);
    let cta = match (text(block, "cta_text"), link(block, "cta_link")) {
        (Some(label), link) => format!(
            "<a class=\"button\" href=\"{}\">{}</a>",
            encode_minimal(link.as_deref().unwrap_or("#")),
            encode_minimal(&label)
        ),
        (None, _) => String::new(),
    };
    format!(
        "<div class=\"hero\" style=\"background-color: {}\"><h1>{}</h1>{}{cta}</div>",
        encode_minimal(&background),
        encode_minimal(&text_or(block, "headline", "Welcome")),
        heading(block, "p", "subheadline"),
    )
}

fn render_text(block: &Block) -> String {
    let body = text(block, "body")
        .map(|body| {
            body.split("\n\n")
                .map(|paragraph| format!("<p>{}</p>", encode_minimal(paragraph.trim())))
                .collect::<String>()
        })
        .unwrap_or_default();
    format!("{}{body}", heading(block, "h2", "heading"))
}

fn render_pricing(block: &Block) -> String {
    let currency = text_or(block, "currency", "kr.");
    let plans: String = (1..=3)
        .filter_map(|index| {
            let name = text(block, &format!("plan_{index}_name"))?;
            let price = text_or(block, &format!("plan_{index}_price"), "");
            Some(format!(
                "<li><strong>{}</strong> <span>{} {}</span></li>",
                encode_minimal(&name),
                encode_minimal(&price),
                encode_minimal(&currency)
            ))
        })
        .collect();
    format!("{}<ul class=\"plans\">{plans}</ul>", heading(block, "h2", "heading"))
}

fn render_vehicle_list(block: &Block, vehicles: &[Vehicle]) -> String {
    let limit = block
        .config
        .get("limit")
        .and_then(|value| value.as_count())
        .unwrap_or(DEFAULT_VEHICLE_LIMIT);
    let show_prices = block
        .config
        .get("show_prices")
        .and_then(|value| value.as_flag())
        .unwrap_or(true);
    let items: Vec<String> = vehicles
        .iter()
        .filter(|vehicle| vehicle.availability_status != VehicleStatus::Retired)
        .take(limit)
        .map(|vehicle| {
            let mut title = format!("{} {}", vehicle.make, vehicle.model);
            if let Some(year) = vehicle.year {
                title.push_str(&format!(" ({year})"));
            }
            let price = match vehicle.daily_rate {
                Some(rate) if show_prices => format!(
                    "<span class=\"price\">{} / dag</span>",
                    encode_minimal(&format_price(rate))
                ),
                _ => String::new(),
            };
            format!(
                "<li class=\"vehicle\" data-status=\"{}\"><h3>{}</h3>{price}</li>",
                encode_minimal(vehicle.availability_status.as_str()),
                encode_minimal(&title)
            )
        })
        .collect();
    let list = if items.is_empty() {
        "<p class=\"empty\">No vehicles available</p>".to_owned()
    } else {
        format!("<ul class=\"vehicles\">{}</ul>", items.concat())
    };
    format!("{}{list}", heading(block, "h2", "heading"))
}

fn render_booking_form(block: &Block) -> String {
    format!(
        "{}<form class=\"booking\" method=\"post\">\
         <input name=\"customer_name\" required>\
         <input name=\"customer_email\" type=\"email\" required>\
         <input name=\"start_date\" type=\"date\" required>\
         <input name=\"end_date\" type=\"date\" required>\
         <button type=\"submit\">{}</button></form>",
        heading(block, "h2", "heading"),
        encode_minimal(&text_or(block, "submit_text", "Book now"))
    )
}

fn contact_lines(email: Option<String>, phone: Option<String>, address: Option<String>) -> String {
    let mut lines = String::new();
    if let Some(email) = email {
        lines.push_str(&format!(
            "<a href=\"mailto:{}\">{}</a>",
            encode_minimal(&email),
            encode_minimal(&email)
        ));
    }
    if let Some(phone) = phone {
        lines.push_str(&format!("<span>{}</span>", encode_minimal(&phone)));
    }
    if let Some(address) = address {
        lines.push_str(&format!("<address>{}</address>", encode_minimal(&address)));
    }
    lines
}

fn render_contact(block: &Block, lessor: Option<&Tenant>) -> String {
    let email = text(block, "email")
        .or_else(|| lessor.map(|tenant| tenant.owner_email.as_str().to_owned()));
    format!(
        "{}<div class=\"contact\">{}</div>",
        heading(block, "h2", "heading"),
        contact_lines(email, text(block, "phone"), text(block, "address"))
    )
}

fn render_image(block: &Block) -> String {
    let Some(src) = link(block, "src") else {
        return String::new();
    };
    let caption = text(block, "caption")
        .map(|caption| format!("<figcaption>{}</figcaption>", encode_minimal(&caption)))
        .unwrap_or_default();
    format!(
        "<figure><img src=\"{}\" alt=\"{}\">{caption}</figure>",
        encode_minimal(&src),
        encode_minimal(&text_or(block, "alt", ""))
    )
}

fn render_call_to_action(block: &Block) -> String {
    format!(
        "<h2>{}</h2><a class=\"button\" href=\"{}\">{}</a>",
        encode_minimal(&text_or(block, "headline", "")),
        encode_minimal(link(block, "button_link").as_deref().unwrap_or("#")),
        encode_minimal(&text_or(block, "button_text", "Learn more"))
    )
}

fn render_testimonial(block: &Block) -> String {
    let author = match (text(block, "author"), text(block, "role")) {
        (Some(author), Some(role)) => format!(
            "<cite>{}, {}</cite>",
            encode_minimal(&author),
            encode_minimal(&role)
        ),
        (Some(author), None) => format!("<cite>{}</cite>", encode_minimal(&author)),
        (None, _) => String::new(),
    };
    format!(
        "<blockquote><p>{}</p>{author}</blockquote>",
        encode_minimal(&text_or(block, "quote", ""))
    )
}

fn render_footer(block: &Block, lessor: Option<&Tenant>) -> String {
    let footer_text = text(block, "text")
        .or_else(|| lessor.map(|tenant| tenant.name.clone()))
        .unwrap_or_default();
    let show_contact = block
        .config
        .get("show_contact")
        .and_then(|value| value.as_flag())
        .unwrap_or(true);
    let contact = match lessor {
        Some(tenant) if show_contact => format!(
            "<div class=\"contact\">{}</div>",
            contact_lines(Some(tenant.owner_email.as_str().to_owned()), None, None)
        ),
        _ => String::new(),
    };
    format!("<footer><p>{}</p>{contact}</footer>", encode_minimal(&footer_text))
}

fn render_unknown(tag: &str) -> String {
    format!(
        "<div class=\"unknown-block\">Unknown block type: {}</div>",
        encode_minimal(tag)
    )
}

/// Render one block.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use lejio::domain::{Block, BlockConfig, BlockId, BlockKind, PageId, RenderContext, render_block};
///
/// let block = Block {
///     id: BlockId::random(),
///     page_id: PageId::random(),
///     block_type: BlockKind::parse("carousel").expect("non-empty tag"),
///     position: 0,
///     config: BlockConfig::default(),
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// };
/// let html = render_block(&block, &RenderContext::default());
/// assert!(html.contains("Unknown block type: carousel"));
/// ```
pub fn render_block(block: &Block, context: &RenderContext<'_>) -> String {
    let inner = match &block.block_type {
        BlockKind::Hero => render_hero(block),
        BlockKind::Text => render_text(block),
        BlockKind::Pricing => render_pricing(block),
        BlockKind::VehicleList => render_vehicle_list(block, context.vehicles),
        BlockKind::BookingForm => render_booking_form(block),
        BlockKind::Contact => render_contact(block, context.lessor),
        BlockKind::Image => render_image(block),
        BlockKind::CallToAction => render_call_to_action(block),
        BlockKind::Testimonial => render_testimonial(block),
        BlockKind::Footer => render_footer(block, context.lessor),
        BlockKind::Other(tag) => render_unknown(tag),
    };
    section(&block.block_type, &inner)
}

/// Render a page body: blocks in position order, or an empty-state notice.
pub fn render_page_body(page: &Page, context: &RenderContext<'_>) -> String {
    let blocks = page.ordered_blocks();
    if blocks.is_empty() {
        return format!("<section class=\"empty-page\"><p>{EMPTY_PAGE_NOTICE}</p></section>");
    }
    blocks
        .into_iter()
        .map(|block| render_block(block, context))
        .collect()
}

/// Render a complete HTML document for a page.
pub fn render_document(page: &Page, context: &RenderContext<'_>) -> String {
    let site_name = context
        .lessor
        .map(|tenant| format!(" | {}", tenant.name))
        .unwrap_or_default();
    let accent = context
        .lessor
        .map(|tenant| tenant.primary_color.as_ref().to_owned())
        .unwrap_or_default();
    let description = page
        .meta_description
        .as_deref()
        .map(|text| format!("<meta name=\"description\" content=\"{}\">", encode_minimal(text)))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html><html lang=\"da\"><head><meta charset=\"utf-8\">\
         <title>{}{}</title>{description}</head>\
         <body style=\"--accent: {}\"><main>{}</main></body></html>",
        encode_minimal(page.title.as_str()),
        encode_minimal(&site_name),
        encode_minimal(&accent),
        render_page_body(page, context)
    )
}
