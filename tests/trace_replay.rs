//! Record detections to a trace, replay them, and render offline.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tm_formats::{write_frame, write_header};
use tm_ir::{Resolution, ThereminConfig};
use tm_master::{
    render_offline, DemoPerformance, DetectionSource, NullOutput, Orchestrator, ScriptedSource,
    TraceSource, DEFAULT_MAX_SECONDS,
};

fn record(source: &mut impl DetectionSource) -> (Vec<u8>, Vec<tm_ir::DetectionFrame>) {
    let mut text = Vec::new();
    let mut frames = Vec::new();
    write_header(&mut text, source.resolution()).unwrap();
    while let Some(frame) = source.next_frame().unwrap() {
        write_frame(&mut text, &frame).unwrap();
        frames.push(frame);
    }
    (text, frames)
}

#[test]
fn replayed_trace_drives_the_same_performance() {
    let config = ThereminConfig::default();
    let mut demo = DemoPerformance::new(&config, Duration::from_secs(9));
    let resolution = demo.resolution();
    let (text, frames) = record(&mut demo);

    let cancel = AtomicBool::new(false);
    let mut direct = Orchestrator::new(&config, resolution, NullOutput::new(44_100)).unwrap();
    direct
        .run(&mut ScriptedSource::new(resolution, frames.clone()), &cancel)
        .unwrap();

    let mut trace = TraceSource::new(text.as_slice()).unwrap();
    assert_eq!(trace.resolution(), resolution);
    let mut replayed = Orchestrator::new(&config, resolution, NullOutput::new(44_100)).unwrap();
    let summary = replayed.run(&mut trace, &cancel).unwrap();

    assert_eq!(summary.frames, frames.len() as u64);
    assert!(summary.calibrated);
    assert_eq!(direct.mapper().region(), replayed.mapper().region());
    assert_eq!(direct.mapper().controls(), replayed.mapper().controls());
    assert_eq!(
        direct.synthesizer().engine().frequency(),
        replayed.synthesizer().engine().frequency()
    );
}

#[test]
fn offline_render_from_trace_text() {
    let mut text = String::from("# two hands held still\nresolution 100 100\n");
    for i in 0..=70 {
        let t = i as f64 / 10.0;
        text.push_str(&format!("{:.1} L 0.9,0.5 1.0,1.0 R 0.0,0.0 0.2,0.3\n", t));
    }
    let config = ThereminConfig {
        sample_rate: 8_000,
        ..ThereminConfig::default()
    };
    let mut trace = TraceSource::new(text.as_bytes()).unwrap();
    let out = render_offline(&config, Resolution::new(100, 100), &mut trace, DEFAULT_MAX_SECONDS).unwrap();

    assert!(out.calibrated);
    assert_eq!(out.frames, 71);
    assert_eq!(out.samples.len(), 7 * 8_000);
    // Silent through the calibration window, sounding after.
    assert!(out.samples[..5 * 8_000].iter().all(|&s| s == 0.0));
    assert!(out.samples[6 * 8_000..].iter().any(|&s| s != 0.0));
}

#[test]
fn malformed_trace_is_an_error() {
    let text = "resolution 100 100\n0.0 L 0.5,0.5\n0.1 Q\n";
    let mut trace = TraceSource::new(text.as_bytes()).unwrap();
    let config = ThereminConfig::default();
    assert!(render_offline(&config, Resolution::new(100, 100), &mut trace, DEFAULT_MAX_SECONDS).is_err());
}
