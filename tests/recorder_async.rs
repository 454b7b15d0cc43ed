use rfpages::{layout, EncodingOptions, Error, Frame, LayoutConfig, PixelSurface, Recorder};

#[tokio::test]
async fn recorder_serialises_concurrent_appends() {
    let recorder = Recorder::new();
    let options = EncodingOptions::default();

    let mut tasks = Vec::new();
    for shade in 0..8u8 {
        let rec = recorder.clone();
        tasks.push(tokio::spawn(async move {
            let surface = PixelSurface::filled(16, 9, [shade * 30, 0, 0, 255]);
            let image = rfpages::capture(&surface, &options).unwrap();
            rec.append(image).await
        }));
    }
    for t in tasks {
        t.await.unwrap().unwrap();
    }
    recorder.page_break().await.unwrap();

    let buffer = recorder.finish().await.unwrap();
    assert_eq!(buffer.len(), 9);
    assert_eq!(buffer.image_count(), 8);
    assert_eq!(buffer.snapshot().last(), Some(&Frame::PageBreak));

    let plan = layout(buffer.snapshot(), &LayoutConfig::default()).unwrap();
    assert_eq!(plan.commands.len(), 8);
    assert_eq!(plan.page_count, 2);
}

#[tokio::test]
async fn snapshot_does_not_consume() {
    let recorder = Recorder::new();
    let surface = PixelSurface::filled(4, 4, [0, 0, 0, 255]);
    recorder.capture(&surface, &EncodingOptions::default()).await.unwrap();

    let first = recorder.snapshot().await.unwrap();
    recorder.page_break().await.unwrap();
    let second = recorder.snapshot().await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 2);
}

#[tokio::test]
async fn invalid_frame_is_reported_and_not_recorded() {
    let recorder = Recorder::new();
    let empty = rfpages::ImageHandle::new(rfpages::EncodedImage::new(rfpages::ImageFormat::Png, 1, 1, Vec::new()));
    let err = recorder.append(empty).await.unwrap_err();
    assert!(matches!(err, Error::InvalidFrame(_)));
    assert!(recorder.snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn clones_fail_after_finish() {
    let recorder = Recorder::new();
    let other = recorder.clone();
    recorder.finish().await.unwrap();
    assert!(matches!(other.page_break().await, Err(Error::Closed)));
}
