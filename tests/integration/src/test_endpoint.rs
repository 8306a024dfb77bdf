//! Protocol-level tests of the simulated endpoint, driven by the bare SDK
//! client rather than the uploader.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::primitives::ByteStream;

    use crate::{s3_client, start_endpoint};

    #[tokio::test]
    async fn test_should_head_bucket_after_create() {
        let server = start_endpoint().await;
        let client = s3_client(&server.endpoint_url());

        client
            .create_bucket()
            .bucket("b1")
            .send()
            .await
            .expect("create_bucket");

        client
            .head_bucket()
            .bucket("b1")
            .send()
            .await
            .expect("head_bucket should succeed");
    }

    #[tokio::test]
    async fn test_should_report_not_found_for_missing_bucket() {
        let server = start_endpoint().await;
        let client = s3_client(&server.endpoint_url());

        let err = client
            .head_bucket()
            .bucket("ghost")
            .send()
            .await
            .expect_err("head on missing bucket should fail")
            .into_service_error();
        assert!(err.is_not_found(), "expected NotFound, got {err:?}");
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_create() {
        let server = start_endpoint().await;
        let client = s3_client(&server.endpoint_url());

        client
            .create_bucket()
            .bucket("b1")
            .send()
            .await
            .expect("create_bucket");

        let result = client.create_bucket().bucket("b1").send().await;
        assert!(result.is_err(), "duplicate create should fail");
    }

    #[tokio::test]
    async fn test_should_round_trip_object_with_content_type() {
        let server = start_endpoint().await;
        let client = s3_client(&server.endpoint_url());

        client
            .create_bucket()
            .bucket("b1")
            .send()
            .await
            .expect("create_bucket");

        let body = b"hello, stowage!";
        client
            .put_object()
            .bucket("b1")
            .key("greeting.txt")
            .body(ByteStream::from_static(body))
            .content_type("text/plain")
            .send()
            .await
            .expect("put_object");

        let resp = client
            .get_object()
            .bucket("b1")
            .key("greeting.txt")
            .send()
            .await
            .expect("get_object");

        assert_eq!(resp.content_type(), Some("text/plain"));
        assert_eq!(resp.content_length(), Some(15));
        assert!(resp.e_tag().is_some(), "etag should be present");

        let data = resp.body.collect().await.expect("collect body").into_bytes();
        assert_eq!(data.as_ref(), body);
    }

    #[tokio::test]
    async fn test_should_reject_put_into_missing_bucket() {
        let server = start_endpoint().await;
        let client = s3_client(&server.endpoint_url());

        let result = client
            .put_object()
            .bucket("ghost")
            .key("k1")
            .body(ByteStream::from_static(b"data"))
            .send()
            .await;
        assert!(result.is_err(), "put into missing bucket should fail");
    }

    #[tokio::test]
    async fn test_should_answer_health_probe() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpStream;

        let server = start_endpoint().await;
        let addr = server.addr();

        let stream = TcpStream::connect(addr).await.expect("connect");
        let (mut reader, mut writer) = stream.into_split();

        let request = format!(
            "GET /_localstack/health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"
        );
        writer.write_all(request.as_bytes()).await.expect("write");
        writer.shutdown().await.expect("shutdown write half");

        let mut response = String::new();
        reader.read_to_string(&mut response).await.expect("read");

        assert!(response.contains("200 OK"), "got: {response}");
        assert!(response.contains("\"s3\":\"running\""), "got: {response}");
    }
}
