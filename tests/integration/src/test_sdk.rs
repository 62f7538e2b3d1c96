//! AWS SDK tests against an external server started with
//! `S3_CONFIGURE_BUCKETS=bucket-a,bucket-b`.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::primitives::ByteStream;

    use crate::{s3_client, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_seeded_buckets() {
        let client = s3_client();
        let resp = client.list_buckets().send().await.expect("list_buckets");
        let names: Vec<&str> = resp.buckets().iter().filter_map(|b| b.name()).collect();
        assert!(names.contains(&"bucket-a"));
        assert!(names.contains(&"bucket-b"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_object_path_style() {
        let client = s3_client();
        let bucket = test_bucket_name("rt");
        client
            .create_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect("create_bucket");

        client
            .put_object()
            .bucket(&bucket)
            .key("a/b.txt")
            .body(ByteStream::from_static(b"payload"))
            .send()
            .await
            .expect("put_object");

        let resp = client
            .list_objects_v2()
            .bucket(&bucket)
            .delimiter("/")
            .send()
            .await
            .expect("list_objects_v2");
        let prefixes: Vec<&str> = resp
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix())
            .collect();
        assert_eq!(prefixes, vec!["a/"]);

        let resp = client
            .get_object()
            .bucket(&bucket)
            .key("a/b.txt")
            .send()
            .await
            .expect("get_object");
        let data = resp.body.collect().await.expect("body").into_bytes();
        assert_eq!(data.as_ref(), b"payload");

        client
            .delete_object()
            .bucket(&bucket)
            .key("a/b.txt")
            .send()
            .await
            .expect("delete_object");
        client
            .delete_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect("delete_bucket");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fail_head_on_missing_bucket() {
        let client = s3_client();
        let result = client
            .head_bucket()
            .bucket(test_bucket_name("missing"))
            .send()
            .await;
        assert!(result.is_err());
    }
}
