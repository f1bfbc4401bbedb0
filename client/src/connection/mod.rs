mod comm;

pub use comm::ConfigComm;
