pub mod mock_backend;
pub mod model_resolver;
pub mod onnx_backend_loader;
pub mod onnx_face_backend;
pub mod onnx_object_backend;
mod preprocess;
