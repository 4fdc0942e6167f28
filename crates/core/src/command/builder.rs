//! ffmpeg argument assembly for one job.

use crate::encoder::rate_flags;

use super::types::{AudioPolicy, Container, Job};

/// Builds the complete ffmpeg argument list for `job` (program name and
/// global log level excluded; the transcoder seam owns those).
///
/// Layout notes:
/// - A crop is a pre-input `-ss` (fast seek) plus a post-input `-to`; with
///   the seek before `-i` the end boundary stays an absolute timestamp.
/// - `-map 0` carries every stream, not just the first video/audio pair.
/// - The stream-copy fast path replaces all codec flags with `-c copy`.
/// - Progress is requested on stdout (`pipe:1`), separate from the log
///   output on stderr.
pub fn build_args(job: &Job) -> Vec<String> {
    let mut args: Vec<String> = vec!["-hide_banner".into(), "-nostats".into()];

    if let Some(crop) = job.crop {
        args.extend(["-ss".into(), crop.start.to_string()]);
    }

    args.extend(["-i".into(), job.input.to_string_lossy().into_owned()]);

    if let Some(crop) = job.crop {
        args.extend(["-to".into(), crop.end.to_string()]);
    }

    args.extend(["-map".into(), "0".into()]);

    if job.container == Container::Mp4 {
        // Relocate the index so playback can start before the download ends.
        args.extend(["-movflags".into(), "+faststart".into()]);
    }

    if job.is_stream_copy() {
        args.extend(["-c".into(), "copy".into()]);
    } else {
        args.extend([
            "-c:v".into(),
            job.encoder.encoder.name().into(),
            "-preset".into(),
            job.preset_token.into(),
        ]);
        args.extend(rate_flags(job.encoder.encoder, job.rate));

        match job.audio {
            AudioPolicy::Copy => args.extend(["-c:a".into(), "copy".into()]),
            AudioPolicy::Encode { codec, bitrate_kbps } => args.extend([
                "-c:a".into(),
                codec.ffmpeg_codec().into(),
                "-b:a".into(),
                format!("{bitrate_kbps}k"),
            ]),
        }

        // Subtitle streams ride along untouched.
        args.extend(["-c:s".into(), "copy".into()]);
    }

    args.extend(["-progress".into(), "pipe:1".into()]);
    args.push(job.output.to_string_lossy().into_owned());

    args
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::command::types::{AudioCodec, CropRange};
    use crate::encoder::{CodecFamily, Encoder, EncoderChoice, RateControl};

    fn base_job() -> Job {
        Job {
            input: PathBuf::from("/in/movie.mkv"),
            output: PathBuf::from("/out/movie_converted.mp4"),
            crop: None,
            encoder: EncoderChoice {
                encoder: Encoder::X265,
                family: CodecFamily::Hevc,
            },
            preset_token: "medium",
            rate: RateControl::Quality(23),
            audio: AudioPolicy::Copy,
            container: Container::Mp4,
            smart_copy: false,
            source_video_codec: Some("h264".to_string()),
        }
    }

    fn position(args: &[String], flag: &str) -> Option<usize> {
        args.iter().position(|a| a == flag)
    }

    #[test]
    fn test_encode_args_shape() {
        let args = build_args(&base_job());
        let joined = args.join(" ");
        assert!(joined.contains("-c:v libx265"));
        assert!(joined.contains("-preset medium"));
        assert!(joined.contains("-crf 23"));
        assert!(joined.contains("-c:a copy"));
        assert!(joined.contains("-c:s copy"));
        assert!(joined.contains("-map 0"));
        assert!(joined.contains("-movflags +faststart"));
        assert!(joined.contains("-progress pipe:1"));
        assert_eq!(args.last().unwrap(), "/out/movie_converted.mp4");
    }

    #[test]
    fn test_crop_is_pre_input_seek_with_absolute_end() {
        let mut job = base_job();
        job.crop = Some(CropRange { start: 30, end: 90 });
        let args = build_args(&job);

        let ss = position(&args, "-ss").unwrap();
        let input = position(&args, "-i").unwrap();
        let to = position(&args, "-to").unwrap();
        assert!(ss < input, "-ss must come before -i");
        assert!(to > input, "-to must come after -i");
        assert_eq!(args[ss + 1], "30");
        assert_eq!(args[to + 1], "90");
    }

    #[test]
    fn test_mkv_omits_faststart() {
        let mut job = base_job();
        job.container = Container::Mkv;
        let args = build_args(&job);
        assert!(position(&args, "-movflags").is_none());
    }

    #[test]
    fn test_stream_copy_fast_path_drops_encode_flags() {
        let mut job = base_job();
        job.smart_copy = true;
        job.source_video_codec = Some("hevc".to_string());
        job.crop = Some(CropRange { start: 5, end: 25 });
        let args = build_args(&job);

        let c = position(&args, "-c").unwrap();
        assert_eq!(args[c + 1], "copy");
        assert!(position(&args, "-c:v").is_none());
        assert!(position(&args, "-preset").is_none());
        assert!(position(&args, "-crf").is_none());
        assert!(position(&args, "-b:v").is_none());
        // Cropping does not disable the fast path.
        assert!(position(&args, "-ss").is_some());
        assert!(position(&args, "-to").is_some());
    }

    #[test]
    fn test_audio_reencode_flags() {
        let mut job = base_job();
        job.audio = AudioPolicy::Encode {
            codec: AudioCodec::Opus,
            bitrate_kbps: 160,
        };
        let args = build_args(&job);
        let joined = args.join(" ");
        assert!(joined.contains("-c:a libopus"));
        assert!(joined.contains("-b:a 160k"));
    }

    #[test]
    fn test_hardware_bitrate_args() {
        let mut job = base_job();
        job.encoder = EncoderChoice {
            encoder: Encoder::HevcNvenc,
            family: CodecFamily::Hevc,
        };
        job.preset_token = "p6";
        job.rate = RateControl::Bitrate(4000);
        let args = build_args(&job);
        let joined = args.join(" ");
        assert!(joined.contains("-c:v hevc_nvenc"));
        assert!(joined.contains("-preset p6"));
        assert!(joined.contains("-rc:v vbr"));
        assert!(joined.contains("-b:v 4000k"));
        assert!(joined.contains("-bufsize 8000k"));
    }

    #[test]
    fn test_progress_request_precedes_output() {
        let args = build_args(&base_job());
        let progress = position(&args, "-progress").unwrap();
        assert_eq!(args[progress + 1], "pipe:1");
        assert_eq!(progress + 2, args.len() - 1);
    }
}
