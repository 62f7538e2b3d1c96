//! Host-header addressing against an in-process server.

#[cfg(test)]
mod tests {
    use reqwest::{Method, StatusCode};
    use s3gate_core::{BucketSeed, ServerConfig};

    use crate::{send, start_server, start_server_with};

    #[tokio::test]
    async fn test_should_list_seeded_buckets_on_endpoint_host() {
        let server = start_server(&["bucket-a", "bucket-b"], true).await;

        let resp = send(&server, Method::GET, "s3.amazonaws.com", "/", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-amz-request-id"));

        let body = resp.text().await.expect("body");
        assert!(body.contains("<ListAllMyBucketsResult"));
        assert!(body.contains("<Name>bucket-a</Name>"));
        assert!(body.contains("<Name>bucket-b</Name>"));
        assert!(body.contains("<CreationDate>"));

        server.stop().await.expect("stop");
    }

    #[tokio::test]
    async fn test_should_list_objects_by_subdomain_and_bare_host() {
        let server = start_server(&["bucket-a"], true).await;

        for host in ["bucket-a.s3.amazonaws.com:4566", "bucket-a:4566"] {
            let resp = send(&server, Method::GET, host, "/", None).await;
            assert_eq!(resp.status(), StatusCode::OK, "{host}");
            let body = resp.text().await.expect("body");
            assert!(body.contains("<ListBucketResult"), "{host}");
            assert!(body.contains("<Name>bucket-a</Name>"), "{host}");
        }

        server.stop().await.expect("stop");
    }

    #[tokio::test]
    async fn test_should_round_trip_object_through_subdomain_host() {
        let server = start_server(&["bucket-a"], true).await;
        let host = "bucket-a.s3.amazonaws.com";

        let resp = send(&server, Method::PUT, host, "/docs/readme.txt", Some("hello")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let etag = resp
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned)
            .expect("etag");

        let resp = send(&server, Method::GET, host, "/docs/readme.txt", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("etag").and_then(|v| v.to_str().ok()),
            Some(etag.as_str())
        );
        assert_eq!(resp.text().await.expect("body"), "hello");

        // The same object is reachable path-style.
        let resp = send(
            &server,
            Method::GET,
            "localhost",
            "/bucket-a/docs/readme.txt",
            None,
        )
        .await;
        assert_eq!(resp.text().await.expect("body"), "hello");

        let resp = send(&server, Method::DELETE, host, "/docs/readme.txt", None).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = send(&server, Method::GET, host, "/docs/readme.txt", None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        server.stop().await.expect("stop");
    }

    #[tokio::test]
    async fn test_should_not_route_spoofed_suffix_to_bucket() {
        let server = start_server(&["bucket-a"], false).await;

        let resp = send(
            &server,
            Method::GET,
            "bucket-a.s3.amazonaws.com.evil.com",
            "/",
            None,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.text().await.expect("body");
        assert!(body.contains("<ListAllMyBucketsResult"));

        server.stop().await.expect("stop");
    }

    #[tokio::test]
    async fn test_should_list_buckets_on_machine_hostname_endpoint() {
        let config = ServerConfig::builder()
            .gateway_listen("127.0.0.1:0".to_owned())
            .service_host("build-box")
            .configure_buckets(vec![BucketSeed::new("bucket-a")])
            .build();
        let server = start_server_with(config).await;

        let resp = send(&server, Method::GET, "build-box:4566", "/", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.text().await.expect("body");
        assert!(body.contains("<ListAllMyBucketsResult"));
        assert!(body.contains("<Name>bucket-a</Name>"));

        // Buckets stay addressable as subdomains of the hostname.
        let resp = send(&server, Method::GET, "bucket-a.build-box:4566", "/", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.text().await.expect("body");
        assert!(body.contains("<ListBucketResult"));

        server.stop().await.expect("stop");
    }

    #[tokio::test]
    async fn test_should_list_buckets_for_bare_host_when_vhost_disabled() {
        let server = start_server(&["bucket-a"], false).await;

        let resp = send(&server, Method::GET, "bucket-a", "/", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.text().await.expect("body");
        assert!(body.contains("<ListAllMyBucketsResult"));

        server.stop().await.expect("stop");
    }

    #[tokio::test]
    async fn test_should_report_missing_bucket_for_unknown_host_bucket() {
        let server = start_server(&["bucket-a"], true).await;

        let resp = send(&server, Method::GET, "bucket-zzz.s3.amazonaws.com", "/", None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = resp.text().await.expect("body");
        assert!(body.contains("<Code>NoSuchBucket</Code>"));

        server.stop().await.expect("stop");
    }

    #[tokio::test]
    async fn test_should_see_buckets_created_after_startup() {
        let server = start_server(&[], true).await;

        let resp = send(&server, Method::PUT, "localhost", "/bucket-late", None).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // An unknown bare host yields to a known bucket in the path.
        let resp = send(&server, Method::GET, "myhost:4566", "/bucket-late", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.text().await.expect("body");
        assert!(body.contains("<Name>bucket-late</Name>"));

        assert!(server.provider.state().bucket_exists("bucket-late"));
        server.stop().await.expect("stop");
    }
}
