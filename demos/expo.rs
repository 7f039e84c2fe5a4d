use std::{env, time::Instant};

use prtscn::{BatchCaptureService, Rectangle};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let rects = if args.is_empty() {
        vec![
            Rectangle::new(0, 0, 320, 180),
            Rectangle::new(320, 0, 320, 180),
            Rectangle::new(0, 180, 320, 180),
            Rectangle::new(320, 180, 320, 180),
        ]
    } else {
        Rectangle::parse_flat(&args)?
    };

    let service = BatchCaptureService::new();

    let start = Instant::now();
    let buffers = service.get_screens(&rects)?;
    println!(
        "get_screens: {} rectangles in {:?}",
        buffers.len(),
        start.elapsed()
    );

    let start = Instant::now();
    let sliced = service.get_screens_single_image(&rects)?;
    println!(
        "get_screens_single_image: {} rectangles in {:?}",
        sliced.len(),
        start.elapsed()
    );

    for (rect, (buffer, sliced)) in rects.iter().zip(buffers.iter().zip(&sliced)) {
        println!(
            "{}x{}+{}+{}: {} bytes, strategies agree: {}",
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            buffer.len(),
            buffer == sliced
        );
    }

    Ok(())
}
