//! Guided three-pose face capture: periodic detection, geometry checks
//! against a region of interest, and a front/left/right capture sequence.

pub mod shared {
    pub mod capture_config;
    pub mod constants;
    pub mod frame_sample;
}

pub mod camera {
    pub mod domain {
        pub mod camera;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod detected_face;
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod capture {
    pub mod domain {
        pub mod capture_status_machine;
        pub mod detection_gate;
        pub mod geometry_validator;
        pub mod pose_sequencer;
        pub mod pose_step;
        pub mod roi_bounds;
    }
}

pub mod feedback {
    pub mod domain {
        pub mod capture_feedback;
    }
    pub mod infrastructure;
}

pub mod handoff {
    pub mod domain {
        pub mod pose_set_handoff;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod capture_session;
    pub mod detection_loop;
}
