//! Error display and status-mapping surfaces.

use axum::http::StatusCode;
use tonic::Code;

use bifrost::gateway::http_status;
use bifrost::{BifrostError, Result, ServiceError};

#[test]
fn status_mapping_follows_the_fixed_table() {
    assert_eq!(http_status(Code::InvalidArgument), StatusCode::BAD_REQUEST);
    assert_eq!(http_status(Code::Unauthenticated), StatusCode::UNAUTHORIZED);
    assert_eq!(http_status(Code::PermissionDenied), StatusCode::FORBIDDEN);
    assert_eq!(http_status(Code::NotFound), StatusCode::NOT_FOUND);
    assert_eq!(
        http_status(Code::ResourceExhausted),
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(http_status(Code::Unimplemented), StatusCode::NOT_IMPLEMENTED);
    assert_eq!(
        http_status(Code::Unavailable),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
        http_status(Code::DeadlineExceeded),
        StatusCode::GATEWAY_TIMEOUT
    );
    assert_eq!(
        http_status(Code::Internal),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(http_status(Code::Unknown), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn service_error_chooses_its_grpc_code() {
    let status: tonic::Status = ServiceError::NotFound("x".into()).into();
    assert_eq!(status.code(), Code::NotFound);
    let status: tonic::Status = ServiceError::InvalidArgument("x".into()).into();
    assert_eq!(status.code(), Code::InvalidArgument);
    let status: tonic::Status = ServiceError::PermissionDenied("x".into()).into();
    assert_eq!(status.code(), Code::PermissionDenied);
    let status: tonic::Status = ServiceError::Internal("x".into()).into();
    assert_eq!(status.code(), Code::Internal);
}

#[test]
fn bind_error_names_the_address() {
    let err = BifrostError::Bind {
        addr: "127.0.0.1:8081".parse().unwrap(),
        source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
    };
    assert!(err.to_string().contains("127.0.0.1:8081"));
}

#[test]
fn dial_error_names_the_target() {
    let err = BifrostError::Dial {
        target: "http://10.0.0.7:50051".to_string(),
        message: "connection refused".to_string(),
    };
    let display = err.to_string();
    assert!(display.contains("10.0.0.7"));
    assert!(display.contains("connection refused"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(BifrostError::Schema("empty".to_string()))
    }
    assert!(returns_error().is_err());
}
