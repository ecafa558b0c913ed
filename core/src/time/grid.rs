use crate::time::{signature_map::TimeSignatureMap, ticks::Ticks};

///! A bar or beat line of the timeline ruler. `beat_index == 0` is the bar line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
  pub tick: Ticks,
  pub bar_index: i64,
  pub beat_index: u32,
}

impl GridLine {
  pub fn is_bar(&self) -> bool {
    self.beat_index == 0
  }
}

impl TimeSignatureMap {
  ///! Bar and beat lines within `[start, end]`, in tick order.
  pub fn grid_lines(&self, start: Ticks, end: Ticks) -> Vec<GridLine> {
    let mut lines = Vec::new();
    if end < start {
      return lines;
    }

    let segments = self.segments();
    let start_meter = self.get_meter_status(start);
    let end_meter = self.get_meter_status(end);
    let last_bar = end_meter.bar();

    for index in start_meter.time_signature_index..=end_meter.time_signature_index {
      let segment = &segments[index];
      // the first segment also covers the bars before it, down to bar 0
      let first_bar = if index == 0 {
        start_meter.bar().max(0)
      } else {
        segment.bar_index.max(start_meter.bar())
      };
      let next_bar = segments
        .get(index + 1)
        .map_or(last_bar + 1, |next| next.bar_index.min(last_bar + 1));

      let ticks_per_bar = segment.signature.ticks_per_bar();
      let ticks_per_beat = segment.signature.ticks_per_beat();
      for bar_index in first_bar..next_bar {
        let bar_tick =
          segment.start_tick + (bar_index - segment.bar_index) as f64 * ticks_per_bar;
        for beat_index in 0..segment.signature.get_numerator() {
          let tick = bar_tick + f64::from(beat_index) * ticks_per_beat;
          if tick >= start && tick <= end {
            lines.push(GridLine {
              tick,
              bar_index,
              beat_index,
            });
          }
        }
      }
    }

    lines
  }
}
