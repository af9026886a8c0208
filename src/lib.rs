pub mod shared {
    pub mod core {
        pub mod clock;
    }
    pub mod infrastructure {
        pub mod storage;
        pub mod workbook;
    }
}

pub mod modules {
    pub mod registry {
        pub mod core {
            pub mod allocation;
            pub mod normalize;
            pub mod records;
            pub mod stages;
            pub mod status;
            pub mod table;
        }
        pub mod cache {
            pub mod dataset;
            pub mod refresh;
            pub mod store;
        }
        pub mod use_cases {
            pub mod errors;
            pub mod register_batch {
                pub mod command;
                pub mod decide;
                pub mod decision;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod record_inspection {
                pub mod command;
                pub mod decide;
                pub mod decision;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod edit_work_order {
                pub mod command;
                pub mod decide;
                pub mod decision;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod manage_clients {
                pub mod command;
                pub mod decide;
                pub mod decision;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod browse_datasets {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
    }
}

pub mod shell;
