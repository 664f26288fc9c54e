//! User interface themes: skins, stylesheet generation, cascade support.
//!
//! A [`Theme`] maps control kinds to style descriptions and owns a generated
//! stylesheet registered with the document for the theme's lifetime.
//! Selectors are `.{prefix}{tag}`, with `:hover`/`:disabled`/`:active`/
//! `:focus` variants for stateful controls; the control tree assigns the
//! matching class names during a cascade.

use crate::ui::native::{NativeBackend, StylesheetId};

/// A CSS value, such as a solid color, gradient, or time.
pub type CssValue = String;

/// Convert a size in points to its CSS rendition.
fn points_in_css(points: f64) -> String {
    format!("{}rem", points * 0.25)
}

// ---------------------------------------------------------------------------
// Skins
// ---------------------------------------------------------------------------

/// Font styling shared by every skinned control.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontSkin {
    /// A CSS font family.
    pub font: Option<String>,
    pub font_color: Option<CssValue>,
    /// Font size in points.
    pub font_size: Option<f64>,
    pub italic: bool,
    pub bold: bool,
    pub upper_case: bool,
}

/// A rectangle outline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stroke {
    pub color: Option<CssValue>,
    /// Stroke size in points.
    pub size: f64,
    /// Corner radius in points.
    pub radius: Option<f64>,
}

/// Fill and outline of a rectangular control.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RectangleSkin {
    pub background: Option<CssValue>,
    pub stroke: Option<Stroke>,
}

/// Margin or padding sizes, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spacing {
    /// The same size on all four sides.
    All(f64),
    /// Horizontal and vertical sizes.
    Axes { horizontal: f64, vertical: f64 },
    /// Individual sides; unset sides are left to the cascade.
    Sides {
        left: Option<f64>,
        right: Option<f64>,
        top: Option<f64>,
        bottom: Option<f64>,
    },
}

/// Property animated by a [`Transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionProperty {
    Background,
    Stroke,
    FontColor,
    FontSize,
    Margin,
    Padding,
}

impl TransitionProperty {
    fn as_css(self) -> &'static str {
        match self {
            TransitionProperty::Background => "background",
            TransitionProperty::Stroke => "border",
            TransitionProperty::FontColor => "color",
            TransitionProperty::FontSize => "font-size",
            TransitionProperty::Margin => "margin",
            TransitionProperty::Padding => "padding",
        }
    }
}

/// A CSS transition on one property.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub property: TransitionProperty,
    /// Duration as CSS time.
    pub duration: CssValue,
    /// CSS easing function.
    pub easing: Option<CssValue>,
    /// Delay as CSS time.
    pub delay: Option<CssValue>,
}

/// Skin for the application root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationSkin {
    pub font: FontSkin,
    pub background: Option<CssValue>,
}

/// Skin for one button state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonStateSkin {
    pub rectangle: RectangleSkin,
    pub font: FontSkin,
}

/// Skin for one button level, with per-state variants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonSkin {
    pub font: FontSkin,
    pub transitions: Vec<Transition>,
    pub padding: Option<Spacing>,
    pub margin: Option<Spacing>,
    pub normal: Option<ButtonStateSkin>,
    pub hovered: Option<ButtonStateSkin>,
    pub pressed: Option<ButtonStateSkin>,
    pub disabled: Option<ButtonStateSkin>,
    pub focused: Option<ButtonStateSkin>,
}

/// Skins for the three button levels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonSkins {
    pub primary: Option<ButtonSkin>,
    pub secondary: Option<ButtonSkin>,
    pub danger: Option<ButtonSkin>,
}

/// Styling of selectable text in a selected state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStateSkin {
    pub font: FontSkin,
    pub background: Option<CssValue>,
}

/// Text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Skin for labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSkin {
    pub font: FontSkin,
    pub background: Option<CssValue>,
    pub align: Option<TextAlign>,
    pub selected: Option<TextStateSkin>,
}

/// Skin for one heading level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadingSkin {
    pub font: FontSkin,
    pub margin: Option<Spacing>,
}

/// Skins for the four heading levels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadingTitleSkins {
    pub heading1: Option<HeadingSkin>,
    pub heading2: Option<HeadingSkin>,
    pub heading3: Option<HeadingSkin>,
    pub heading4: Option<HeadingSkin>,
}

/// Skin for subtitles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtitleSkin {
    pub font: FontSkin,
    pub margin: Option<Spacing>,
}

/// Skin for paragraphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphSkin {
    pub font: FontSkin,
    pub background: Option<CssValue>,
    pub margin: Option<Spacing>,
    pub selected: Option<TextStateSkin>,
}

/// Per-control-kind style descriptions of a theme.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeControls {
    pub application: Option<ApplicationSkin>,
    pub button: Option<ButtonSkins>,
    pub label: Option<LabelSkin>,
    pub heading_title: Option<HeadingTitleSkins>,
    pub subtitle: Option<SubtitleSkin>,
    pub paragraph: Option<ParagraphSkin>,
}

/// A font to load with the theme, as a CSS `@font-face` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeFont {
    /// The font family.
    pub font: String,
    /// The weight of the specified resource.
    pub weight: Option<String>,
    /// Resources containing the font data (CSS `src` descriptors).
    pub sources: Vec<String>,
}

/// Configuration for [`Theme::new`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeOptions {
    pub controls: ThemeControls,
    pub fonts: Vec<ThemeFont>,
    /// Default CSS font family. Falls back to `serif`.
    pub default_font: Option<String>,
}

// ---------------------------------------------------------------------------
// StylesheetBuilder
// ---------------------------------------------------------------------------

/// Assembles the CSS text of a theme. Purely mechanical string building.
struct StylesheetBuilder {
    default_font: String,
    output: Vec<String>,
}

impl StylesheetBuilder {
    fn new(default_font: &str) -> Self {
        Self {
            default_font: default_font.to_owned(),
            output: Vec::new(),
        }
    }

    fn push(&mut self, text: String) {
        self.output.push(text);
    }

    fn build(self) -> String {
        self.output.join("")
    }

    fn resets(&self) -> String {
        "margin: 0;padding: 0;border: 0;".to_owned()
    }

    fn font(&self, skin: &FontSkin, emit_default_font: bool) -> String {
        let mut out = String::new();
        if let Some(color) = &skin.font_color {
            out.push_str(&format!("color: {color};"));
        }
        if emit_default_font {
            let family = skin.font.as_deref().unwrap_or(&self.default_font);
            out.push_str(&format!("font-family: {family};"));
        } else if let Some(family) = &skin.font {
            out.push_str(&format!("font-family: {family};"));
        }
        if let Some(size) = skin.font_size {
            out.push_str(&format!("font-size: {};", points_in_css(size)));
        }
        if skin.italic {
            out.push_str("font-style: italic;");
        }
        if skin.bold {
            out.push_str("font-weight: bold;");
        }
        if skin.upper_case {
            out.push_str("text-transform: uppercase;");
        }
        out
    }

    fn rectangle(&self, skin: &RectangleSkin) -> String {
        let mut out = String::new();
        if let Some(background) = &skin.background {
            out.push_str(&format!("background: {background};"));
        }
        if let Some(stroke) = &skin.stroke {
            let color = stroke.color.as_deref().unwrap_or("currentColor");
            out.push_str(&format!(
                "border: {} solid {color};",
                points_in_css(stroke.size)
            ));
            if let Some(radius) = stroke.radius {
                out.push_str(&format!("border-radius: {};", points_in_css(radius)));
            }
        }
        out
    }

    fn spacing(&self, property: &str, spacing: &Spacing) -> String {
        match spacing {
            Spacing::All(size) => format!("{property}: {};", points_in_css(*size)),
            Spacing::Axes {
                horizontal,
                vertical,
            } => format!(
                "{property}: {} {};",
                points_in_css(*vertical),
                points_in_css(*horizontal)
            ),
            Spacing::Sides {
                left,
                right,
                top,
                bottom,
            } => {
                let mut out = String::new();
                for (side, size) in [
                    ("left", left),
                    ("right", right),
                    ("top", top),
                    ("bottom", bottom),
                ] {
                    if let Some(size) = size {
                        out.push_str(&format!("{property}-{side}: {};", points_in_css(*size)));
                    }
                }
                out
            }
        }
    }

    fn transitions(&self, transitions: &[Transition]) -> String {
        if transitions.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = transitions
            .iter()
            .map(|tr| {
                let mut part = format!("{} {}", tr.property.as_css(), tr.duration);
                if let Some(easing) = &tr.easing {
                    part.push_str(&format!(" {easing}"));
                }
                if let Some(delay) = &tr.delay {
                    part.push_str(&format!(" {delay}"));
                }
                part
            })
            .collect();
        format!("transition: {};", parts.join(", "))
    }

    fn application(&self, skin: &ApplicationSkin) -> String {
        format!(
            "{}user-select: none;font-family: {};{}background: {};",
            self.resets(),
            self.default_font,
            self.font(&skin.font, false),
            skin.background.as_deref().unwrap_or("#fff")
        )
    }

    fn button(&self, skin: &ButtonSkin) -> String {
        let mut out = self.resets();
        out.push_str(&self.font(&skin.font, true));
        out.push_str("user-select: none;");
        out.push_str(&self.transitions(&skin.transitions));
        if let Some(padding) = &skin.padding {
            out.push_str(&self.spacing("padding", padding));
        }
        if let Some(margin) = &skin.margin {
            out.push_str(&self.spacing("margin", margin));
        }
        let normal = skin.normal.clone().unwrap_or_default();
        out.push_str(&self.button_state(&normal));
        out
    }

    fn button_state(&self, skin: &ButtonStateSkin) -> String {
        format!("{}{}", self.rectangle(&skin.rectangle), self.font(&skin.font, false))
    }

    fn text_state(&self, skin: &TextStateSkin) -> String {
        let mut out = self.font(&skin.font, false);
        if let Some(background) = &skin.background {
            out.push_str(&format!("background: {background};"));
        }
        out
    }

    fn label(&self, skin: &LabelSkin) -> String {
        let mut out = self.font(&skin.font, true);
        if let Some(background) = &skin.background {
            out.push_str(&format!("background: {background};"));
        }
        if let Some(align) = skin.align {
            out.push_str(&format!("text-align: {};", align.as_css()));
        }
        out
    }

    fn heading_title(&self, skin: &HeadingSkin) -> String {
        let mut out = self.resets();
        out.push_str(&self.font(&skin.font, true));
        if let Some(margin) = &skin.margin {
            out.push_str(&self.spacing("margin", margin));
        }
        out
    }

    fn subtitle(&self, skin: &SubtitleSkin) -> String {
        let mut out = self.font(&skin.font, true);
        if let Some(margin) = &skin.margin {
            out.push_str(&self.spacing("margin", margin));
        }
        out
    }

    fn paragraph(&self, skin: &ParagraphSkin) -> String {
        let mut out = self.font(&skin.font, true);
        if let Some(background) = &skin.background {
            out.push_str(&format!("background: {background};"));
        }
        if let Some(margin) = &skin.margin {
            out.push_str(&self.spacing("margin", margin));
        }
        out
    }

    fn font_face(&self, font: &ThemeFont) -> String {
        let mut out = format!("@font-face {{font-family: {};", font.font);
        if let Some(weight) = &font.weight {
            out.push_str(&format!("font-weight: {weight};"));
        }
        out.push_str(&format!("src: {};}}", font.sources.join(", ")));
        out
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// An user interface theme.
///
/// Constructing a theme registers an anonymous stylesheet with the document,
/// using `{themeClass}-t-` as the class prefix for every rule. The
/// stylesheet lives until [`unload`](Theme::unload).
#[derive(Debug)]
pub struct Theme {
    theme_class: String,
    class_prefix: String,
    controls: ThemeControls,
    fonts: Vec<ThemeFont>,
    default_font: String,
    stylesheet: StylesheetId,
}

impl Theme {
    /// Construct a theme and register its stylesheet with the document.
    ///
    /// `theme_class` is the CSS class prefix of the theme.
    pub fn new(
        theme_class: impl Into<String>,
        options: ThemeOptions,
        native: &mut dyn NativeBackend,
    ) -> Self {
        let theme_class = theme_class.into();
        let class_prefix = format!("{theme_class}-t-");
        let default_font = options.default_font.unwrap_or_else(|| "serif".to_owned());

        let mut theme = Self {
            theme_class,
            class_prefix,
            controls: options.controls,
            fonts: options.fonts,
            default_font,
            stylesheet: StylesheetId(0),
        };
        theme.stylesheet = native.register_stylesheet(&theme.stylesheet_text());
        theme
    }

    /// The theme's CSS class prefix, e.g. `metro-t-` for theme class
    /// `metro`. Control classes are `{prefix}{tag}`.
    pub fn class_prefix(&self) -> &str {
        &self.class_prefix
    }

    /// The CSS selector prefix, starting with a dot (`.`).
    pub fn selector_prefix(&self) -> String {
        format!(".{}", self.class_prefix)
    }

    /// The theme class this theme was constructed with.
    pub fn theme_class(&self) -> &str {
        &self.theme_class
    }

    /// The per-control skins.
    pub fn controls(&self) -> &ThemeControls {
        &self.controls
    }

    /// The default CSS font family.
    pub fn default_font(&self) -> &str {
        &self.default_font
    }

    /// Unload the stylesheet that was registered when the theme was
    /// constructed.
    pub fn unload(&self, native: &mut dyn NativeBackend) {
        native.unregister_stylesheet(self.stylesheet);
    }

    /// The generated stylesheet text.
    pub fn stylesheet_text(&self) -> String {
        let prefix = self.selector_prefix();
        let mut builder = StylesheetBuilder::new(&self.default_font);

        for font in &self.fonts {
            let rule = builder.font_face(font);
            builder.push(rule);
        }

        self.build_application(&prefix, &mut builder);
        self.build_button(&prefix, &mut builder);
        self.build_label(&prefix, &mut builder);
        self.build_heading_title(&prefix, &mut builder);
        self.build_subtitle(&prefix, &mut builder);
        self.build_paragraph(&prefix, &mut builder);

        builder.build()
    }

    fn build_application(&self, prefix: &str, builder: &mut StylesheetBuilder) {
        let skin = self.controls.application.clone().unwrap_or_default();
        let body = builder.application(&skin);
        builder.push(format!("{prefix}application {{{body}}}"));
    }

    fn build_button(&self, prefix: &str, builder: &mut StylesheetBuilder) {
        let skins = self.controls.button.clone().unwrap_or_default();
        let mut level = |name: &str, skin: Option<ButtonSkin>| {
            let skin = skin.unwrap_or_default();
            let body = builder.button(&skin);
            builder.push(format!("{prefix}button-{name} {{{body}}}"));
            for (pseudo, state) in [
                (":hover", &skin.hovered),
                (":disabled", &skin.disabled),
                (":active", &skin.pressed),
                (":focus", &skin.focused),
            ] {
                if let Some(state) = state {
                    let body = builder.button_state(state);
                    builder.push(format!("{prefix}button-{name}{pseudo} {{{body}}}"));
                }
            }
        };
        level("primary", skins.primary);
        level("secondary", skins.secondary);
        level("danger", skins.danger);
    }

    fn build_label(&self, prefix: &str, builder: &mut StylesheetBuilder) {
        let skin = self.controls.label.clone().unwrap_or_default();
        let selected = builder.text_state(&skin.selected.clone().unwrap_or_default());
        let body = builder.label(&skin);
        builder.push(format!("{prefix}label {{{body}}}"));
        builder.push(format!("{prefix}label::selection {{{selected}}}"));
        builder.push(format!("{prefix}label::-moz-selection {{{selected}}}"));
    }

    fn build_heading_title(&self, prefix: &str, builder: &mut StylesheetBuilder) {
        let skins = self.controls.heading_title.clone().unwrap_or_default();
        for (level, skin) in [
            (1, skins.heading1),
            (2, skins.heading2),
            (3, skins.heading3),
            (4, skins.heading4),
        ] {
            let body = builder.heading_title(&skin.unwrap_or_default());
            builder.push(format!("{prefix}heading-title-{level} {{{body}}}"));
        }
    }

    fn build_subtitle(&self, prefix: &str, builder: &mut StylesheetBuilder) {
        let skin = self.controls.subtitle.clone().unwrap_or_default();
        let body = builder.subtitle(&skin);
        builder.push(format!("{prefix}subtitle {{{body}}}"));
    }

    fn build_paragraph(&self, prefix: &str, builder: &mut StylesheetBuilder) {
        let skin = self.controls.paragraph.clone().unwrap_or_default();
        let selected = builder.text_state(&skin.selected.clone().unwrap_or_default());
        let body = builder.paragraph(&skin);
        builder.push(format!("{prefix}paragraph {{{body}}}"));
        builder.push(format!("{prefix}paragraph::selection {{{selected}}}"));
    }
}

// ---------------------------------------------------------------------------
// Built-in theme
// ---------------------------------------------------------------------------

/// The built-in default theme: dark application chrome, sans-serif type.
///
/// The application root always carries this theme unless another is set, so
/// theme resolution succeeds for any attached subtree.
pub fn slate_theme(native: &mut dyn NativeBackend) -> Theme {
    Theme::new(
        "slate",
        ThemeOptions {
            default_font: Some("'Segoe UI', 'Open Sans', 'Noto Sans', sans-serif".to_owned()),
            fonts: Vec::new(),
            controls: ThemeControls {
                application: Some(ApplicationSkin {
                    font: FontSkin {
                        font_color: Some("#fff".to_owned()),
                        ..Default::default()
                    },
                    background: Some("#222".to_owned()),
                }),
                button: Some(ButtonSkins {
                    primary: Some(ButtonSkin {
                        padding: Some(Spacing::Axes {
                            horizontal: 4.0,
                            vertical: 2.0,
                        }),
                        normal: Some(ButtonStateSkin {
                            rectangle: RectangleSkin {
                                background: Some("#3a6ea5".to_owned()),
                                stroke: None,
                            },
                            font: FontSkin {
                                font_color: Some("#fff".to_owned()),
                                ..Default::default()
                            },
                        }),
                        hovered: Some(ButtonStateSkin {
                            rectangle: RectangleSkin {
                                background: Some("#4a7eb5".to_owned()),
                                stroke: None,
                            },
                            font: FontSkin::default(),
                        }),
                        ..Default::default()
                    }),
                    danger: Some(ButtonSkin {
                        normal: Some(ButtonStateSkin {
                            rectangle: RectangleSkin {
                                background: Some("#a53a3a".to_owned()),
                                stroke: None,
                            },
                            font: FontSkin {
                                font_color: Some("#fff".to_owned()),
                                ..Default::default()
                            },
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        },
        native,
    )
}

// ===========================================================================
// Tests
// ===========================================================================
