pub mod mock_subscriber;
