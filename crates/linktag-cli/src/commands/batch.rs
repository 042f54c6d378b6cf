//! Batch command implementation
//!
//! Reads one JSON job per line, renders the jobs in parallel and prints one
//! JSON result per job, in input order.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
};

use linktag::{export::write_label_to, fontdb::FontResolver, prelude::*};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    cli::BatchArgs,
    job::{font_resolver, output_path, LabelJob, PayloadSource, SlotSource},
};

fn default_template() -> String {
    "bar".to_string()
}

fn default_dpi() -> u32 {
    300
}

fn default_font_size() -> f32 {
    18.0
}

fn default_ports() -> String {
    "48".to_string()
}

/// One line of the input file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BatchJob {
    /// Echoed back in the result; defaults to the line number
    #[serde(default)]
    id: Option<String>,
    #[serde(default = "default_template")]
    template: String,
    #[serde(default = "default_dpi")]
    dpi: u32,
    #[serde(default = "default_font_size")]
    font_size: f32,
    #[serde(default)]
    payload: Option<String>,
    #[serde(default)]
    link: Option<LinkJob>,
    #[serde(default)]
    slots: Option<Vec<SlotJob>>,
    #[serde(default)]
    auto_slots: Option<usize>,
    #[serde(default)]
    color: Option<String>,
    /// Border thickness in points
    #[serde(default)]
    border: Option<f32>,
    #[serde(default)]
    border_color: Option<String>,
    /// File name relative to the output directory
    #[serde(default)]
    output: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LinkJob {
    base: String,
    from: String,
    to: String,
    #[serde(default = "default_ports")]
    ports: String,
}

/// A slot as plain text or as `{"text": .., "color": ..}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SlotJob {
    Text(String),
    Styled {
        text: String,
        #[serde(default)]
        color: Option<String>,
    },
}

/// What came out of one job
#[derive(Debug, Serialize)]
struct JobResult {
    id: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl JobResult {
    fn success(id: String, path: String) -> Self {
        Self {
            id,
            status: "success",
            path: Some(path),
            error: None,
        }
    }

    fn error(id: String, message: impl Into<String>) -> Self {
        Self {
            id,
            status: "error",
            path: None,
            error: Some(message.into()),
        }
    }
}

impl BatchJob {
    fn label_job(&self) -> Result<LabelJob> {
        let template = LabelTemplate::by_name(&self.template)?;
        let fill = match &self.color {
            Some(hex) => Color::from_hex(hex)?,
            None => Color::SLOT,
        };
        let payload = match (&self.payload, &self.link) {
            (Some(_), Some(_)) => {
                return Err(LabelError::InvalidRequest(
                    "give either payload or link, not both".into(),
                ))
            },
            (Some(payload), None) => PayloadSource::Literal(payload.clone()),
            (None, Some(link)) => PayloadSource::link(&link.base, &link.from, &link.to, &link.ports)?,
            (None, None) => {
                return Err(LabelError::InvalidRequest("job has neither payload nor link".into()))
            },
        };
        let slots = match (&self.slots, self.auto_slots) {
            (Some(_), Some(_)) => {
                return Err(LabelError::InvalidRequest(
                    "give either slots or auto_slots, not both".into(),
                ))
            },
            (Some(slots), None) => SlotSource::Explicit(
                slots
                    .iter()
                    .map(|slot| slot.spec(fill))
                    .collect::<Result<_>>()?,
            ),
            (None, Some(count)) => SlotSource::Auto(count),
            (None, None) => SlotSource::AutoAll,
        };
        let border = match self.border {
            Some(pt) => {
                let color = match &self.border_color {
                    Some(hex) => Color::from_hex(hex)?,
                    None => Color::BORDER,
                };
                Some((pt, color))
            },
            None => None,
        };
        Ok(LabelJob {
            template,
            dpi: self.dpi,
            font_size_pt: self.font_size,
            payload,
            slots,
            fill,
            border,
        })
    }
}

impl SlotJob {
    fn spec(&self, default_fill: Color) -> Result<SlotSpec> {
        match self {
            Self::Text(text) => Ok(SlotSpec::new(text.as_str(), default_fill)),
            Self::Styled { text, color } => {
                let fill = match color {
                    Some(hex) => Color::from_hex(hex)?,
                    None => default_fill,
                };
                Ok(SlotSpec::new(text.as_str(), fill))
            },
        }
    }
}

pub fn run(args: &BatchArgs) -> Result<()> {
    if args.jobs > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.jobs)
            .build_global()
            .map_err(|e| LabelError::ConfigError(format!("thread pool: {e}")))?;
    }

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => {
            if !args.quiet {
                eprintln!("Reading jobs from stdin...");
            }
            Box::new(BufReader::new(io::stdin()))
        },
    };

    let mut lines = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push((index + 1, line));
        }
    }

    std::fs::create_dir_all(&args.output)?;
    let fonts = font_resolver(args.font_file.as_deref());

    let results: Vec<JobResult> = lines
        .par_iter()
        .map(|(line_number, line)| run_line(*line_number, line, &fonts, args))
        .collect();

    let failed = results.iter().filter(|r| r.status == "error").count();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for result in &results {
        serde_json::to_writer(&mut out, result)
            .map_err(|e| LabelError::Io(io::Error::other(e)))?;
        writeln!(out)?;
    }

    if !args.quiet {
        eprintln!(
            "Batch complete: {} job(s), {} ok, {} failed",
            results.len(),
            results.len() - failed,
            failed
        );
    }

    if failed > 0 {
        Err(LabelError::InvalidRequest(format!("{failed} job(s) failed")))
    } else {
        Ok(())
    }
}

fn run_line(line_number: usize, line: &str, fonts: &FontResolver, args: &BatchArgs) -> JobResult {
    let fallback_id = format!("line-{line_number}");
    let job: BatchJob = match serde_json::from_str(line) {
        Ok(job) => job,
        Err(e) => return JobResult::error(fallback_id, format!("invalid job: {e}")),
    };
    let id = job.id.clone().unwrap_or(fallback_id);

    let rendered = job.label_job().and_then(|label_job| {
        let label = label_job.render(fonts)?;
        let path = match &job.output {
            Some(name) => args.output.join(name),
            None => output_path(&args.output, &label.file_stem),
        };
        write_label_to(&label, &path)?;
        Ok(path)
    });

    match rendered {
        Ok(path) => {
            log::debug!("batch: {} -> {}", id, path.display());
            JobResult::success(id, path.display().to_string())
        },
        Err(e) => {
            log::debug!("batch: {} failed: {}", id, e);
            JobResult::error(id, e.to_string())
        },
    }
}
