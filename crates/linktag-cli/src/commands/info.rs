//! Info command implementation

use linktag::{
    fontdb::FontResolver,
    prelude::*,
    template::{TemplateFamily, SUPPORTED_DPI},
};

use crate::cli::InfoArgs;

pub fn run(args: &InfoArgs) -> Result<()> {
    let show_all = !args.templates && !args.fonts;

    println!("linktag v{}", env!("CARGO_PKG_VERSION"));
    println!();

    if show_all || args.templates {
        print_templates();
        println!();
        println!(
            "Densities (dpi): {}",
            SUPPORTED_DPI.map(|d| d.to_string()).join(", ")
        );
        if show_all {
            println!();
        }
    }

    if show_all || args.fonts {
        print_fonts();
    }

    Ok(())
}

fn print_templates() {
    println!("Templates:");
    for (name, template) in LabelTemplate::presets() {
        println!(
            "  {:<10} {:>4.1} x {:<4.1} cm  {:?}, {} slot(s), {}",
            name,
            template.width_cm,
            template.height_cm,
            template.orientation(),
            template.slot_count,
            template.family.name()
        );
    }
    let (min, max) = TemplateFamily::CodeWithStack.slot_range();
    println!("  stack-N    any N in {min}..={max}");
    println!();
    println!(
        "Colors: slot {}, blank {}, text {}, code {}, border {}",
        Color::SLOT.to_hex(),
        Color::PLACEHOLDER.to_hex(),
        Color::INK.to_hex(),
        Color::CODE_DARK.to_hex(),
        Color::BORDER.to_hex()
    );
}

fn print_fonts() {
    let resolver = FontResolver::system_default();
    println!("Fonts (first loaded wins):");
    if resolver.is_builtin() {
        println!("  built-in 10x20 bitmap font (no outline font found)");
    }
    for font in resolver.fonts() {
        println!("  {}", font.name());
    }
}
