//! Render command implementation

use linktag::{export::write_label_to, link::parse_slot_lines, prelude::*};

use crate::{
    cli::RenderArgs,
    job::{font_resolver, output_path, parse_slot_arg, LabelJob, PayloadSource, SlotSource},
};

pub fn run(args: &RenderArgs) -> Result<()> {
    let job = label_job(args)?;
    let fonts = font_resolver(args.font_file.as_deref());
    let label = job.render(&fonts)?;

    let path = output_path(&args.output, &label.file_stem);
    write_label_to(&label, &path)?;

    if !args.quiet {
        eprintln!(
            "{} ({}x{} px, {} dpi)",
            path.display(),
            label.bitmap.width,
            label.bitmap.height,
            label.dpi
        );
    }
    Ok(())
}

fn label_job(args: &RenderArgs) -> Result<LabelJob> {
    let template = LabelTemplate::by_name(&args.template)?;
    let fill = Color::from_hex(&args.color)?;

    let payload = match (&args.payload, &args.link, &args.from, &args.to) {
        (Some(payload), ..) => PayloadSource::Literal(payload.clone()),
        (None, Some(base), Some(from), Some(to)) => {
            PayloadSource::link(base, from, to, &args.ports)?
        },
        _ => {
            return Err(LabelError::InvalidRequest(
                "either --payload or --link with --from and --to is required".into(),
            ))
        },
    };

    let slots = if let Some(path) = &args.slots_file {
        let text = std::fs::read_to_string(path)?;
        SlotSource::Explicit(
            parse_slot_lines(&text)
                .iter()
                .map(|line| parse_slot_arg(line, fill))
                .collect::<Result<_>>()?,
        )
    } else if let Some(count) = args.auto_slots {
        SlotSource::Auto(count)
    } else if args.slots.is_empty() && matches!(payload, PayloadSource::Link(_)) {
        SlotSource::AutoAll
    } else {
        SlotSource::Explicit(
            args.slots
                .iter()
                .map(|raw| parse_slot_arg(raw, fill))
                .collect::<Result<_>>()?,
        )
    };

    let border = match args.border {
        Some(pt) => Some((pt, Color::from_hex(&args.border_color)?)),
        None => None,
    };

    Ok(LabelJob {
        template,
        dpi: args.dpi,
        font_size_pt: args.font_size,
        payload,
        slots,
        fill,
        border,
    })
}
