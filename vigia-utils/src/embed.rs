use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x34_98_db;

pub const TITLE_LIMIT: usize = 256;
pub const DESCRIPTION_LIMIT: usize = 4096;
pub const FIELD_NAME_LIMIT: usize = 256;
pub const FIELD_VALUE_LIMIT: usize = 1024;
pub const FOOTER_LIMIT: usize = 2048;
pub const MAX_FIELDS: usize = 25;

/// Named colors used by log records and notices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorTag {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Purple,
    Grey,
    DarkRed,
    Default,
}

impl ColorTag {
    pub fn hex(self) -> u32 {
        match self {
            ColorTag::Red => 0xFF_55_55,
            ColorTag::Green => 0x55_FF_55,
            ColorTag::Blue => 0x55_55_FF,
            ColorTag::Yellow => 0xFF_FF_55,
            ColorTag::Orange => 0xFF_AA_00,
            ColorTag::Purple => 0xAA_00_AA,
            ColorTag::Grey => 0xAA_AA_AA,
            ColorTag::DarkRed => 0xAA_00_00,
            ColorTag::Default => DEFAULT_EMBED_COLOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Platform-neutral embed description.
///
/// Commands and log records build these; the gateway adapter turns them into
/// serenity builders with [`Embed::to_create_embed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub color: ColorTag,
    pub description: Option<String>,
    pub fields: Vec<EmbedField>,
    pub thumbnail: Option<String>,
    pub footer: Option<String>,
    pub timestamp: bool,
}

impl Embed {
    pub fn new(title: impl Into<String>, color: ColorTag) -> Self {
        Self {
            title: title.into(),
            color,
            description: None,
            fields: Vec::new(),
            thumbnail: None,
            footer: None,
            timestamp: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField::new(name, value, inline));
        self
    }

    pub fn thumbnail(mut self, url: Option<String>) -> Self {
        self.thumbnail = url;
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn timestamp(mut self) -> Self {
        self.timestamp = true;
        self
    }

    /// Clamp every part to the platform's size limits.
    pub fn truncated(mut self) -> Self {
        self.title = truncate(&self.title, TITLE_LIMIT);
        self.description = self
            .description
            .map(|text| truncate(&text, DESCRIPTION_LIMIT));
        self.footer = self.footer.map(|text| truncate(&text, FOOTER_LIMIT));
        self.fields.truncate(MAX_FIELDS);
        for field in &mut self.fields {
            field.name = truncate(&field.name, FIELD_NAME_LIMIT);
            field.value = if field.value.trim().is_empty() {
                "N/A".to_owned()
            } else {
                truncate(&field.value, FIELD_VALUE_LIMIT)
            };
        }
        self
    }

    pub fn to_create_embed(&self) -> serenity::CreateEmbed {
        let embed = self.clone().truncated();

        let mut builder = serenity::CreateEmbed::new()
            .title(embed.title)
            .color(embed.color.hex())
            .fields(
                embed
                    .fields
                    .into_iter()
                    .map(|field| (field.name, field.value, field.inline)),
            );

        if let Some(description) = embed.description {
            builder = builder.description(description);
        }
        if let Some(url) = embed.thumbnail {
            builder = builder.thumbnail(url);
        }
        if let Some(footer) = embed.footer {
            builder = builder.footer(serenity::CreateEmbedFooter::new(footer));
        }
        if embed.timestamp {
            builder = builder.timestamp(serenity::Timestamp::now());
        }

        builder
    }
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let keep = max_chars.saturating_sub(3);
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str("...");
    cut
}
