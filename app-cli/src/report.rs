use timeline_core::song::Song;
use timeline_core::time::{BarsTime, Seconds, Signature, Ticks};

#[derive(Debug, Clone, PartialEq)]
pub struct BarRow {
  pub bar: i64,
  pub tick: Ticks,
  pub seconds: Seconds,
  pub bpm: f64,
  pub signature: Signature,
}

pub fn bar_rows(song: &Song, bars: u32) -> Vec<BarRow> {
  let tempo_map = song.tempo_map();
  let signature_map = song.signature_map();
  (0..i64::from(bars))
    .map(|bar| {
      let tick = signature_map.get_tick_by_bar_index(bar);
      BarRow {
        bar,
        tick,
        seconds: tempo_map.get_time(tick),
        bpm: tempo_map.get_bpm(tick),
        signature: signature_map.signature_at_bar(bar),
      }
    })
    .collect()
}

pub fn print(song: &Song, bars: u32) {
  let tempo_map = song.tempo_map();
  let signature_map = song.signature_map();

  println!("Song: {}", song.get_name());
  println!();
  println!("{:>5} {:>10} {:>10} {:>8} {:>6}", "bar", "tick", "seconds", "bpm", "meter");
  for row in bar_rows(song, bars) {
    println!(
      "{:>5} {:>10.1} {:>10.3} {:>8.2} {:>6}",
      row.bar + 1,
      row.tick,
      row.seconds,
      row.bpm,
      row.signature.to_string()
    );
  }

  for track in song.tracks() {
    println!();
    println!(
      "Track: {}{}{}",
      track.name(),
      if track.is_mute() { " [mute]" } else { "" },
      if track.is_solo() { " [solo]" } else { "" }
    );
    for part in track.parts().iter() {
      let start = part.start_pos();
      let end = part.end_pos();
      println!(
        "  {:<12} {} - {}  ({:.3}s - {:.3}s)",
        part.name(),
        BarsTime::from_ticks(start, signature_map),
        BarsTime::from_ticks(end, signature_map),
        tempo_map.get_time(start),
        tempo_map.get_time(end)
      );
    }
  }

  println!();
  println!("Length: {:.3}s", song.end_time());
}

#[cfg(test)]
mod test {

  use super::bar_rows;
  use timeline_core::config::Config;
  use timeline_core::song::Song;

  #[test]
  pub fn rows() {
    let mut song = Song::new("test", &Config::default()).unwrap();
    song.tempo_map_mut().add_tempo(3840.0, 60.0).unwrap();
    song
      .signature_map_mut()
      .add_time_signature(1, 3, 4)
      .unwrap();

    let rows = bar_rows(&song, 4);
    let ticks: Vec<f64> = rows.iter().map(|row| row.tick).collect();
    assert_eq!(ticks, vec![0.0, 1920.0, 3360.0, 4800.0]);
    let seconds: Vec<f64> = rows.iter().map(|row| row.seconds).collect();
    assert_eq!(seconds, vec![0.0, 2.0, 3.5, 4.0 + 2.0]);
    assert_eq!(rows[2].bpm, 120.0);
    assert_eq!(rows[3].bpm, 60.0);
    assert_eq!(rows[0].signature.to_string(), "4/4");
    assert_eq!(rows[1].signature.to_string(), "3/4");
  }
}
