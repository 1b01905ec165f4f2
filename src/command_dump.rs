use crate::canvas::{DrawCommand, Recorder};
use crate::text_metrics::TextMeasure;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct CommandDump<'a> {
    pub canvas_id: &'a str,
    pub width: f32,
    pub height: f32,
    pub command_count: usize,
    pub commands: &'a [DrawCommand],
}

impl<'a> CommandDump<'a> {
    pub fn from_recorder<M: TextMeasure>(canvas_id: &'a str, recorder: &'a Recorder<M>) -> Self {
        let (width, height) = recorder.size();
        CommandDump {
            canvas_id,
            width,
            height,
            command_count: recorder.commands().len(),
            commands: recorder.commands(),
        }
    }
}

pub fn commands_to_json<M: TextMeasure>(
    canvas_id: &str,
    recorder: &Recorder<M>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&CommandDump::from_recorder(canvas_id, recorder))
}

pub fn write_command_dump<M: TextMeasure>(
    path: &Path,
    canvas_id: &str,
    recorder: &Recorder<M>,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &CommandDump::from_recorder(canvas_id, recorder))?;
    Ok(())
}
