//! Turning command-line or JSONL input into a render call

use std::path::{Path, PathBuf};

use linktag::{
    code_qr::QrEncoder,
    fontdb::{FontResolver, FontSource},
    link::split_position,
    prelude::*,
    units::pt_to_px,
};

/// Where the code payload comes from
#[derive(Debug, Clone)]
pub enum PayloadSource {
    Literal(String),
    Link(LinkId),
}

impl PayloadSource {
    /// Builds a link from `RACK-UNIT` positions.
    pub fn link(base: &str, from: &str, to: &str, ports: &str) -> Result<Self> {
        let (rack_from, unit_from) = split_position(from).ok_or_else(|| {
            LabelError::InvalidRequest(format!("'{from}' is not a RACK-UNIT position"))
        })?;
        let (rack_to, unit_to) = split_position(to).ok_or_else(|| {
            LabelError::InvalidRequest(format!("'{to}' is not a RACK-UNIT position"))
        })?;
        let link = LinkId::new(
            base,
            (&rack_from, &unit_from),
            (&rack_to, &unit_to),
            ports,
        );
        if link.base.is_empty() {
            return Err(LabelError::InvalidRequest("link base must not be empty".into()));
        }
        Ok(Self::Link(link))
    }

    pub fn payload(&self) -> String {
        match self {
            Self::Literal(payload) => payload.clone(),
            Self::Link(link) => link.payload(),
        }
    }

    fn as_link(&self) -> Option<&LinkId> {
        match self {
            Self::Link(link) => Some(link),
            Self::Literal(_) => None,
        }
    }
}

/// How the slots get their text
#[derive(Debug, Clone)]
pub enum SlotSource {
    /// Explicit list; must match the template's slot count
    Explicit(Vec<SlotSpec>),
    /// `BASE.1 .. BASE.n` from the link, remaining slots blank
    Auto(usize),
    /// Every slot numbered from the link
    AutoAll,
}

/// Everything one label needs
#[derive(Debug, Clone)]
pub struct LabelJob {
    pub template: LabelTemplate,
    pub dpi: u32,
    pub font_size_pt: f32,
    pub payload: PayloadSource,
    pub slots: SlotSource,
    pub fill: Color,
    pub border: Option<(f32, Color)>,
}

impl LabelJob {
    /// The request the renderer sees.
    pub fn request(&self) -> Result<RenderRequest> {
        let slots = match &self.slots {
            SlotSource::Explicit(slots) => slots.clone(),
            SlotSource::Auto(count) => self.auto_slots(*count)?,
            SlotSource::AutoAll => self.auto_slots(self.template.slot_count)?,
        };
        Ok(RenderRequest::new(self.dpi, self.font_size_pt, self.payload.payload()).slots(slots))
    }

    fn auto_slots(&self, count: usize) -> Result<Vec<SlotSpec>> {
        let link = self.payload.as_link().ok_or_else(|| {
            LabelError::InvalidRequest("numbered slots need a link identifier".into())
        })?;
        if count > self.template.slot_count {
            return Err(LabelError::SlotCountMismatch {
                expected: self.template.slot_count,
                actual: count,
            });
        }
        let mut slots: Vec<SlotSpec> = link
            .auto_slot_texts(count)
            .into_iter()
            .map(|text| SlotSpec::new(text, self.fill))
            .collect();
        slots.resize(self.template.slot_count, SlotSpec::blank());
        Ok(slots)
    }

    pub fn style(&self) -> RenderStyle {
        RenderStyle {
            border: self.border.map(|(pt, color)| Border {
                color,
                width_px: pt_to_px(pt, self.dpi),
            }),
            ..Default::default()
        }
    }

    /// Renders with `fonts` and returns the label, named after the link when there is one.
    pub fn render(&self, fonts: &FontResolver) -> Result<RenderedLabel> {
        let renderer = LabelRenderer::builder()
            .provider(fonts.clone())
            .encoder(QrEncoder::new())
            .style(self.style())
            .build()?;
        let mut label = renderer.render(&self.template, &self.request()?)?;
        if let Some(link) = self.payload.as_link() {
            label.file_stem = link.file_stem();
        }
        Ok(label)
    }
}

/// System fonts, optionally preceded by a user-supplied file.
pub fn font_resolver(font_file: Option<&Path>) -> FontResolver {
    let resolver = match font_file {
        Some(path) => FontResolver::with_preferred(FontSource::path(path)),
        None => FontResolver::system_default(),
    };
    if let Some(path) = font_file {
        if resolver.rejected().iter().any(|r| Path::new(r) == path) {
            log::warn!("font file {} could not be loaded, falling back", path.display());
        }
    }
    if resolver.is_builtin() {
        log::warn!("no outline font available; text uses the built-in bitmap font");
    }
    resolver
}

/// Parses `TEXT` or `TEXT:#RRGGBB`.
pub fn parse_slot_arg(raw: &str, default_fill: Color) -> Result<SlotSpec> {
    match raw.rsplit_once(":#") {
        Some((text, hex)) => Ok(SlotSpec::new(text, Color::from_hex(hex)?)),
        None => Ok(SlotSpec::new(raw, default_fill)),
    }
}

/// `output` itself when it names a .png file, else `output/<stem>.png`.
pub fn output_path(output: &Path, stem: &str) -> PathBuf {
    let is_png = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        output.to_path_buf()
    } else {
        output.join(format!("{stem}.png"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link_job(template: LabelTemplate, slots: SlotSource) -> LabelJob {
        LabelJob {
            template,
            dpi: 300,
            font_size_pt: 18.0,
            payload: PayloadSource::link("2L3", "D12-43", "AE12-43", "48").unwrap(),
            slots,
            fill: Color::SLOT,
            border: None,
        }
    }

    #[test]
    fn test_link_payload() {
        let source = PayloadSource::link(" 2L3 ", "D12 - 43", "AE12-43", "48").unwrap();
        assert_eq!(source.payload(), "2L3/D12-43/AE12-43/48P");
    }

    #[test]
    fn test_bad_position_rejected() {
        assert!(PayloadSource::link("2L3", "D12", "AE12-43", "48").is_err());
    }

    #[test]
    fn test_auto_slots_pad_with_blanks() {
        let job = link_job(LabelTemplate::code_with_stack(6).unwrap(), SlotSource::Auto(2));
        let request = job.request().unwrap();
        let texts: Vec<&str> = request.slots.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["2L3.1", "2L3.2", "", "", "", ""]);
        assert!(request.slots[2].is_blank());
    }

    #[test]
    fn test_auto_all_fills_template() {
        let job = link_job(LabelTemplate::code_with_stack(3).unwrap(), SlotSource::AutoAll);
        let request = job.request().unwrap();
        assert_eq!(request.slots.len(), 3);
        assert_eq!(request.slots[2].text, "2L3.3");
    }

    #[test]
    fn test_too_many_auto_slots_rejected() {
        let job = link_job(LabelTemplate::code_with_bar(), SlotSource::Auto(2));
        assert!(matches!(
            job.request(),
            Err(LabelError::SlotCountMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_auto_slots_need_link() {
        let mut job = link_job(LabelTemplate::code_with_bar(), SlotSource::AutoAll);
        job.payload = PayloadSource::Literal("x".into());
        assert!(job.request().is_err());
    }

    #[test]
    fn test_slot_arg_with_color() {
        let slot = parse_slot_arg("2L3.1:#00ff00", Color::SLOT).unwrap();
        assert_eq!(slot.text, "2L3.1");
        assert_eq!(slot.fill, Color::rgb(0, 255, 0));

        let slot = parse_slot_arg("12:30", Color::SLOT).unwrap();
        assert_eq!(slot.text, "12:30");
        assert_eq!(slot.fill, Color::SLOT);

        assert!(parse_slot_arg("x:#nothex", Color::SLOT).is_err());
    }

    #[test]
    fn test_border_converted_at_job_dpi() {
        let mut job = link_job(LabelTemplate::code_with_bar(), SlotSource::AutoAll);
        job.border = Some((1.2, Color::BORDER));
        // 1.2 pt at 300 dpi
        assert_eq!(job.style().border.map(|b| b.width_px), Some(5));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(output_path(Path::new("out"), "a"), PathBuf::from("out/a.png"));
        assert_eq!(output_path(Path::new("x/label.PNG"), "a"), PathBuf::from("x/label.PNG"));
    }
}
