use std::path::Path;

use hanguk_core::speech::AudioBuffer;

/// Write the buffer as 16-bit PCM WAV
pub fn write_wav(path: &Path, buffer: &AudioBuffer) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: buffer.channel_count(),
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for frame in 0..buffer.frame_count() {
        for channel in &buffer.channels {
            let sample = (channel[frame] * 32768.0).clamp(i16::MIN as f32, i16::MAX as f32);
            writer.write_sample(sample as i16)?;
        }
    }
    writer.finalize()?;

    tracing::info!(
        "Wrote {:.2}s of audio to {}",
        buffer.duration().as_secs_f64(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let buffer = AudioBuffer {
            sample_rate: 24000,
            channels: vec![vec![-1.0, 0.0, 0.5], vec![0.25, 0.0, -0.5]],
        };

        write_wav(&path, &buffer).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 24000);
        assert_eq!(spec.bits_per_sample, 16);

        let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![-32768, 8192, 0, 0, 16384, -16384]);
    }
}
